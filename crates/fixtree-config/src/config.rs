use std::path::{Path, PathBuf};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::file_format::FileFormat;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "fixtree.json";

fn default_true() -> bool {
    true
}

fn default_database() -> PathBuf {
    PathBuf::from("db/development.sqlite3")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_dump_dir() -> PathBuf {
    PathBuf::from("db")
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("fixtures/models")
}

fn default_trees_dir() -> PathBuf {
    PathBuf::from("fixtures/trees")
}

fn default_skeleton_dir() -> PathBuf {
    PathBuf::from("spec/fixtures")
}

/// Top-level fixtree configuration.
///
/// Every path is relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FixtreeConfig {
    /// SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Directory holding model definitions.
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    /// Target of raw table dumps (`dump`).
    #[serde(default = "default_dump_dir")]
    pub dump_dir: PathBuf,
    /// Per-model fixtures (`fixture`, `load`, split tree dumps).
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,
    /// Single-file tree dumps.
    #[serde(default = "default_trees_dir")]
    pub trees_dir: PathBuf,
    /// Skeleton fixtures and join-table fixtures.
    #[serde(default = "default_skeleton_dir")]
    pub skeleton_dir: PathBuf,
    /// Format used when writing new model definitions.
    #[serde(default)]
    pub model_format: FileFormat,
    /// Render fixture files as templates before parsing them.
    #[serde(default = "default_true")]
    pub render_templates: bool,
}

impl Default for FixtreeConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            models_dir: default_models_dir(),
            dump_dir: default_dump_dir(),
            fixtures_dir: default_fixtures_dir(),
            trees_dir: default_trees_dir(),
            skeleton_dir: default_skeleton_dir(),
            model_format: FileFormat::default(),
            render_templates: true,
        }
    }
}

impl FixtreeConfig {
    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn dump_dir(&self) -> &Path {
        &self.dump_dir
    }

    pub fn fixtures_dir(&self) -> &Path {
        &self.fixtures_dir
    }

    pub fn trees_dir(&self) -> &Path {
        &self.trees_dir
    }

    pub fn skeleton_dir(&self) -> &Path {
        &self.skeleton_dir
    }

    pub fn model_format(&self) -> FileFormat {
        self.model_format
    }

    pub fn render_templates(&self) -> bool {
        self.render_templates
    }
}
