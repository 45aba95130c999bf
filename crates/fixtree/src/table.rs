use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fixtree_core::{Conditions, ModelDef, Record, Value};
use fixtree_loader::{read_yaml_file, write_yaml_file};
use fixtree_naming::{fixture_key, join_key};
use fixtree_query::{
    SelectFilter, build_delete_all, build_insert, build_select, build_select_all,
};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::FixtureError;
use crate::fixtures::Fixtures;

/// Options for [`TableFixtures::to_fixture`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureOptions {
    /// Directory to write into. Defaults to `fixturesDir`.
    pub save_path: Option<PathBuf>,
    /// File name. Defaults to `<table>.yml`.
    pub save_name: Option<String>,
    /// Append to the file instead of replacing it.
    pub append: bool,
    /// Column whose value names each fixture. Rows without a value fall back
    /// to `<Class>-<id>`.
    pub key: Option<String>,
    pub conditions: Option<Conditions>,
}

impl FixtureOptions {
    pub fn with_save_path(mut self, save_path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(save_path.into());
        self
    }

    pub fn with_save_name(mut self, save_name: impl Into<String>) -> Self {
        self.save_name = Some(save_name.into());
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }
}

/// Dump and load operations for one model's table.
pub struct TableFixtures<'a> {
    fixtures: &'a Fixtures,
    model: &'a ModelDef,
}

impl<'a> TableFixtures<'a> {
    pub fn new(fixtures: &'a Fixtures, model: &'a ModelDef) -> Self {
        Self { fixtures, model }
    }

    pub fn model(&self) -> &'a ModelDef {
        self.model
    }

    pub fn table_name(&self) -> String {
        self.model.table_name()
    }

    /// Write the table's rows to `path` (default `<dumpDir>/<table>.yml`) as
    /// a key -> row mapping, then dump its join tables. Returns the number of
    /// rows written.
    pub fn dump_to_file(
        &self,
        path: Option<&Path>,
        limit: Option<u64>,
        filter: SelectFilter,
    ) -> Result<usize, FixtureError> {
        let table = self.table_name();
        let filter = match limit {
            Some(limit) => filter.with_limit(limit),
            None => filter,
        };
        let rows = self
            .fixtures
            .db()
            .query(&build_select(&table, &filter))?;
        let count = rows.len();

        let path = self.target_path(path, self.fixtures.config().dump_dir(), &table);
        write_yaml_file(&path, &self.keyed(rows, None), false)?;
        info!(table = %table, rows = count, path = %path.display(), "dumped table");

        self.habtm_to_file()?;
        Ok(count)
    }

    /// Copy every join table of this model's many-to-many associations to
    /// `<dumpDir>/<join_table>.yml`.
    pub fn habtm_to_file(&self) -> Result<Vec<PathBuf>, FixtureError> {
        self.write_join_tables(self.fixtures.config().dump_dir())
    }

    /// Like [`habtm_to_file`](Self::habtm_to_file), into `dir` or `skeletonDir`.
    pub fn habtm_to_fixture(&self, dir: Option<&Path>) -> Result<Vec<PathBuf>, FixtureError> {
        self.write_join_tables(dir.unwrap_or(self.fixtures.config().skeleton_dir()))
    }

    fn write_join_tables(&self, dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
        let mut written = Vec::new();
        for assoc in self.model.habtm_associations() {
            let target = self.fixtures.models().target_of(self.model, assoc)?;
            let join_table = assoc.join_table_for(self.model, target);
            let rows = self.fixtures.db().query(&build_select_all(&join_table))?;
            let count = rows.len();
            let keyed: BTreeMap<String, Record> = rows
                .into_iter()
                .enumerate()
                .map(|(idx, row)| (join_key(idx), row))
                .collect();

            let path = self
                .fixtures
                .resolve_path(&dir.join(format!("{join_table}.yml")));
            write_yaml_file(&path, &keyed, false)?;
            info!(
                join_table = %join_table,
                rows = count,
                path = %path.display(),
                "dumped join table"
            );
            written.push(path);
        }
        Ok(written)
    }

    /// Replace the table's contents with the fixtures in `path` (default
    /// `<fixturesDir>/<table>.yml`).
    ///
    /// The file is read before anything is deleted, so an unreadable file
    /// leaves the table as it was. Every column is inserted as written, so
    /// the inheritance column keeps each row's subtype. There is no
    /// transaction: a failed insert leaves the rows loaded so far.
    pub fn load_from_file(&self, path: Option<&Path>) -> Result<usize, FixtureError> {
        let table = self.table_name();
        let primary_key = &self.model.primary_key;
        let db = self.fixtures.db();
        let path = self.target_path(path, self.fixtures.config().fixtures_dir(), &table);

        let records: IndexMap<String, Record> =
            read_yaml_file(&path, self.fixtures.config().render_templates())?.unwrap_or_default();

        db.execute(&build_delete_all(&table))?;
        db.reset_sequence(&table, primary_key)?;
        for (name, record) in &records {
            debug!(
                table = %table,
                fixture = %name,
                subtype = self.model.subtype(record),
                ?record,
                "insert fixture"
            );
            db.execute(&build_insert(&table, record)?)?;
        }

        db.reset_sequence(&table, primary_key)?;
        info!(table = %table, rows = records.len(), path = %path.display(), "loaded table");
        Ok(records.len())
    }

    /// Write the rows matching `options.conditions` as a test fixture file.
    pub fn to_fixture(&self, options: &FixtureOptions) -> Result<PathBuf, FixtureError> {
        let table = self.table_name();
        let dir = options
            .save_path
            .as_deref()
            .unwrap_or(self.fixtures.config().fixtures_dir());
        let name = options
            .save_name
            .clone()
            .unwrap_or_else(|| format!("{table}.yml"));
        let path = self.fixtures.resolve_path(&dir.join(name));

        let filter = SelectFilter {
            conditions: options.conditions.clone(),
            ..SelectFilter::default()
        };
        let rows = self
            .fixtures
            .db()
            .query(&build_select(&table, &filter))?;
        let count = rows.len();

        write_yaml_file(&path, &self.keyed(rows, options.key.as_deref()), options.append)?;
        info!(
            table = %table,
            rows = count,
            path = %path.display(),
            append = options.append,
            "wrote fixture"
        );
        Ok(path)
    }

    /// Write two blank records listing every column, as a starting point for
    /// hand-written fixtures.
    pub fn to_skeleton(&self, dir: Option<&Path>) -> Result<PathBuf, FixtureError> {
        let table = self.table_name();
        let blank: Record = self
            .fixtures
            .db()
            .columns(&table)?
            .into_iter()
            .map(|column| (column, Value::Null))
            .collect();
        let skeleton = BTreeMap::from([
            ("record_1".to_string(), blank.clone()),
            ("record_2".to_string(), blank),
        ]);

        let dir = dir.unwrap_or(self.fixtures.config().skeleton_dir());
        let path = self.target_path(None, dir, &table);
        write_yaml_file(&path, &skeleton, false)?;
        info!(table = %table, path = %path.display(), "wrote skeleton");
        Ok(path)
    }

    fn target_path(&self, path: Option<&Path>, default_dir: &Path, table: &str) -> PathBuf {
        match path {
            Some(path) => self.fixtures.resolve_path(path),
            None => self
                .fixtures
                .resolve_path(&default_dir.join(format!("{table}.yml"))),
        }
    }

    /// Key rows by `key` column when present, else by `<Class>-<id>`.
    fn keyed(&self, rows: Vec<Record>, key: Option<&str>) -> BTreeMap<String, Record> {
        rows.into_iter()
            .enumerate()
            .map(|(idx, row)| (self.fixture_name(&row, key, idx), row))
            .collect()
    }

    fn fixture_name(&self, row: &Record, key: Option<&str>, idx: usize) -> String {
        if let Some(value) = key.and_then(|k| row.get(k)).filter(|v| !v.is_null()) {
            return value.to_string();
        }
        match row.get(&self.model.primary_key) {
            Some(Value::Integer(id)) => fixture_key(&self.model.name, *id),
            Some(value) if !value.is_null() => value.to_string(),
            // Tables without a usable primary key are numbered in row order.
            _ => fixture_key(&self.model.name, idx as i64 + 1),
        }
    }
}
