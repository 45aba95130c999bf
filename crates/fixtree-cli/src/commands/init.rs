use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use fixtree_config::{CONFIG_FILE_NAME, FixtreeConfig};

pub fn cmd_init(root: Option<&Path>) -> Result<()> {
    let path = root.unwrap_or(Path::new(".")).join(CONFIG_FILE_NAME);
    if path.exists() {
        bail!("{CONFIG_FILE_NAME} already exists");
    }

    let config = FixtreeConfig::default();
    let json = serde_json::to_string_pretty(&config).context("serialize default config")?;
    fs::write(&path, json).context("write fixtree.json")?;
    println!("created {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CwdGuard;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    #[serial_test::serial]
    fn cmd_init_creates_config() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        cmd_init(None).unwrap();
        assert!(PathBuf::from(CONFIG_FILE_NAME).exists());
    }

    #[test]
    #[serial_test::serial]
    fn cmd_init_fails_when_exists() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        cmd_init(None).unwrap();
        let err = cmd_init(None).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn cmd_init_writes_under_root() {
        let tmp = tempdir().unwrap();
        cmd_init(Some(tmp.path())).unwrap();

        let text = fs::read_to_string(tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        let config: FixtreeConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(config, FixtreeConfig::default());
    }
}
