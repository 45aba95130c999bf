use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use fixtree_core::{ModelDef, Record, RecordSet};
use fixtree_loader::{collect_yaml_files, read_yaml_file};
use fixtree_query::{build_delete_all, build_insert};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::FixtureError;
use crate::fixtures::Fixtures;

/// Key in [`LoadTreeOptions::except_attributes`] whose columns are dropped
/// from every table.
pub const GLOBAL_EXCEPTIONS: &str = "global";

/// Options for [`Fixtures::load_tree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTreeOptions {
    /// Tables (or class names) whose rows are skipped.
    pub except_models: Vec<String>,
    /// Columns left out of inserted rows, per table name or `global`.
    pub except_attributes: BTreeMap<String, Vec<String>>,
    /// Delete a table's rows before the first rows for it are inserted.
    pub destroy_all: bool,
    /// Reset each table's id sequence around the inserts.
    pub reset_sequence: bool,
}

impl LoadTreeOptions {
    pub fn with_except_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except_models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_except_attributes<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except_attributes
            .entry(table.into())
            .or_default()
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_destroy_all(mut self, destroy_all: bool) -> Self {
        self.destroy_all = destroy_all;
        self
    }

    pub fn with_reset_sequence(mut self, reset_sequence: bool) -> Self {
        self.reset_sequence = reset_sequence;
        self
    }

    fn skips(&self, model: &ModelDef) -> bool {
        let table = model.table_name();
        self.except_models
            .iter()
            .any(|name| *name == table || *name == model.name)
    }

    /// Columns to drop for `table`: its own list joined with the global one.
    fn excepted_columns(&self, table: &str) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for key in [table, GLOBAL_EXCEPTIONS] {
            for column in self.except_attributes.get(key).into_iter().flatten() {
                if !columns.contains(&column.as_str()) {
                    columns.push(column);
                }
            }
        }
        columns
    }
}

impl Fixtures {
    /// Insert the rows of tree files (`Class: [rows]`) into their tables.
    ///
    /// Each path may be a file or a directory of YAML files. Files are
    /// rendered as templates before parsing when `renderTemplates` is set.
    /// Returns the number of rows inserted per class, in load order.
    pub fn load_tree(
        &self,
        paths: &[PathBuf],
        options: &LoadTreeOptions,
    ) -> Result<IndexMap<String, usize>, FixtureError> {
        if paths.is_empty() {
            return Err(FixtureError::NoFiles);
        }

        let mut loaded: IndexMap<String, usize> = IndexMap::new();
        let mut cleared: HashSet<String> = HashSet::new();
        for path in paths {
            for file in collect_yaml_files(&self.resolve_path(path))? {
                let Some(tree) =
                    read_yaml_file::<RecordSet>(&file, self.config().render_templates())?
                else {
                    debug!(file = %file.display(), "empty tree file");
                    continue;
                };
                info!(file = %file.display(), classes = tree.len(), "loading tree");

                for (class_name, rows) in tree {
                    if let Some(count) =
                        self.prepare_records(&class_name, rows, options, &mut cleared)?
                    {
                        *loaded.entry(class_name).or_default() += count;
                    }
                }
            }
        }
        Ok(loaded)
    }

    fn prepare_records(
        &self,
        class_name: &str,
        rows: Vec<Record>,
        options: &LoadTreeOptions,
        cleared: &mut HashSet<String>,
    ) -> Result<Option<usize>, FixtureError> {
        let model = self.models().resolve(class_name)?;
        let table = model.table_name();
        if options.skips(model) {
            info!(class = class_name, table = %table, "skipping excepted model");
            return Ok(None);
        }

        let db = self.db();
        if options.destroy_all && cleared.insert(table.clone()) {
            let deleted = db.execute(&build_delete_all(&table))?;
            debug!(table = %table, deleted, "destroyed existing rows");
        }
        if options.reset_sequence {
            db.reset_sequence(&table, &model.primary_key)?;
        }

        let excepted = options.excepted_columns(&table);
        let count = rows.len();
        for mut row in rows {
            for column in &excepted {
                row.remove(*column);
            }
            debug!(table = %table, subtype = model.subtype(&row), ?row, "insert tree row");
            db.execute(&build_insert(&table, &row)?)?;
        }

        if options.reset_sequence {
            db.reset_sequence(&table, &model.primary_key)?;
        }
        info!(class = class_name, table = %table, rows = count, "loaded rows");
        Ok(Some(count))
    }
}
