use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use fixtree_config::{CONFIG_FILE_NAME, FixtreeConfig};

/// Load fixtree.json from the current directory.
pub fn load_config() -> Result<FixtreeConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if !path.exists() {
        anyhow::bail!("{CONFIG_FILE_NAME} not found. Run 'fixtree init' first.");
    }

    let content = fs::read_to_string(&path).context("read fixtree.json")?;
    let config: FixtreeConfig = serde_json::from_str(&content).context("parse fixtree.json")?;
    Ok(config)
}

/// Load config from a specific path.
pub fn load_config_from_path(path: PathBuf) -> Result<FixtreeConfig> {
    if !path.exists() {
        anyhow::bail!("{CONFIG_FILE_NAME} not found at: {}", path.display());
    }

    let content = fs::read_to_string(&path).context("read fixtree.json")?;
    let config: FixtreeConfig = serde_json::from_str(&content).context("parse fixtree.json")?;
    Ok(config)
}

/// Load config from project root, with fallback to defaults.
pub fn load_config_or_default(project_root: Option<PathBuf>) -> Result<FixtreeConfig> {
    let config_path = match project_root {
        Some(root) => root.join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    };

    if config_path.exists() {
        load_config_from_path(config_path)
    } else {
        Ok(FixtreeConfig::default())
    }
}
