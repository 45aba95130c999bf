use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fixtree::{Fixtures, GLOBAL_EXCEPTIONS};
use fixtree_config::FixtreeConfig;
use fixtree_loader::{load_config, load_config_or_default};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Project root and config. An explicit root may run without fixtree.json;
/// the current directory must have one.
pub fn load_project(root: Option<&Path>) -> Result<(PathBuf, FixtreeConfig)> {
    match root {
        Some(root) => {
            let config = load_config_or_default(Some(root.to_path_buf()))?;
            Ok((root.to_path_buf(), config))
        }
        None => {
            let config = load_config()?;
            let cwd = std::env::current_dir().context("read current directory")?;
            Ok((cwd, config))
        }
    }
}

/// Load models and open the database for the project at `root`.
pub fn open_project(root: Option<&Path>) -> Result<Fixtures> {
    let (root, config) = load_project(root)?;
    let database = root.join(config.database());
    debug!(root = %root.display(), database = %database.display(), "opening project");
    if !database.exists() {
        bail!("database not found: {}", database.display());
    }
    Ok(Fixtures::open(root, config)?)
}

/// Parse `table.column` (or a bare `column`, which applies to every table).
pub fn parse_except_attribute(spec: &str) -> Result<(String, String)> {
    let (table, column) = match spec.split_once('.') {
        Some((table, column)) => (table, column),
        None => (GLOBAL_EXCEPTIONS, spec),
    };
    if table.is_empty() || column.is_empty() {
        bail!("invalid attribute exception '{spec}': expected 'table.column' or 'column'");
    }
    Ok((table.to_string(), column.to_string()))
}
