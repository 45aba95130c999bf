use std::path::{Path, PathBuf};

use fixtree_config::FixtreeConfig;
use fixtree_core::ModelRegistry;
use fixtree_db::{Database, SqliteDatabase};
use fixtree_loader::load_models;
use tracing::info;

use crate::error::FixtureError;
use crate::table::TableFixtures;

/// Everything a dump or load needs: the project root, its config, the
/// declared models and a database connection.
pub struct Fixtures {
    root: PathBuf,
    config: FixtreeConfig,
    models: ModelRegistry,
    db: Box<dyn Database>,
}

impl Fixtures {
    pub fn new(
        root: impl Into<PathBuf>,
        config: FixtreeConfig,
        models: ModelRegistry,
        db: Box<dyn Database>,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            models,
            db,
        }
    }

    /// Load models from the configured directory and open the configured
    /// SQLite database, both relative to `root`.
    pub fn open(root: impl Into<PathBuf>, config: FixtreeConfig) -> Result<Self, FixtureError> {
        let root = root.into();
        let models = load_models(&root, &config)?;
        let db = SqliteDatabase::open(&root.join(config.database()))?;
        info!(
            root = %root.display(),
            models = models.len(),
            database = %config.database().display(),
            "opened project"
        );
        Ok(Self::new(root, config, models, Box::new(db)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &FixtreeConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }

    /// Resolve a path against the project root. Absolute paths are kept.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Operations on one model's table, looked up by class name, table name
    /// or singular name.
    pub fn table(&self, name: &str) -> Result<TableFixtures<'_>, FixtureError> {
        let model = self.models.resolve(name)?;
        Ok(TableFixtures::new(self, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::blog_fixtures;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn table_resolves_any_inflection() {
        let (_dir, fixtures) = blog_fixtures();
        for name in ["User", "users", "user"] {
            assert_eq!(fixtures.table(name).unwrap().model().name, "User");
        }
    }

    #[test]
    fn unknown_table_is_an_error() {
        let (_dir, fixtures) = blog_fixtures();
        let err = fixtures.table("widgets").err().unwrap();
        assert_eq!(err.to_string(), "model not found: widgets");
    }

    #[test]
    fn resolve_path_keeps_absolute_paths() {
        let (dir, fixtures) = blog_fixtures();
        assert_eq!(
            fixtures.resolve_path(Path::new("db/users.yml")),
            dir.path().join("db/users.yml")
        );
        let absolute = dir.path().join("elsewhere.yml");
        assert_eq!(fixtures.resolve_path(&absolute), absolute);
    }

    #[test]
    fn open_reads_models_and_database() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("models")).unwrap();
        fs::create_dir_all(dir.path().join("db")).unwrap();
        fs::write(dir.path().join("models/user.yaml"), "name: User\n").unwrap();

        let fixtures = Fixtures::open(dir.path(), FixtreeConfig::default()).unwrap();
        assert_eq!(fixtures.models().len(), 1);
        assert!(dir.path().join("db/development.sqlite3").exists());
    }
}
