use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fixtree_config::{FileFormat, FixtreeConfig};
use fixtree_core::{ModelDef, ModelRegistry};
use tracing::debug;

/// Load all model definitions below `<root>/<modelsDir>` into a validated registry.
pub fn load_models(root: &Path, config: &FixtreeConfig) -> Result<ModelRegistry> {
    load_models_from_dir(&root.join(config.models_dir()))
}

/// Load all model definitions from a directory (recursively).
pub fn load_models_from_dir(models_dir: &Path) -> Result<ModelRegistry> {
    if !models_dir.exists() {
        return Ok(ModelRegistry::default());
    }

    let mut models = Vec::new();
    load_models_recursive(models_dir, &mut models)?;

    ModelRegistry::new(models).map_err(|e| anyhow::anyhow!("model validation failed: {}", e))
}

/// Recursively walk directory and load model files in path order.
fn load_models_recursive(dir: &Path, models: &mut Vec<ModelDef>) -> Result<()> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("read models directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .context("read directory entry")?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            load_models_recursive(&path, models)?;
            continue;
        }

        let Some(format) = FileFormat::from_path(&path) else {
            continue;
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("read model file: {}", path.display()))?;

        let model: ModelDef = if format.is_json() {
            serde_json::from_str(&content)
                .with_context(|| format!("parse JSON model: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("parse YAML model: {}", path.display()))?
        };
        debug!(model = %model.name, path = %path.display(), "loaded model");
        models.push(model);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtree_core::AssociationDef;
    use tempfile::tempdir;

    fn write_model(dir: &Path, file: &str, model: &ModelDef) {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(file);
        let content = if file.ends_with(".json") {
            serde_json::to_string_pretty(model).unwrap()
        } else {
            serde_yaml::to_string(model).unwrap()
        };
        fs::write(path, content).unwrap();
    }

    #[test]
    fn load_models_returns_empty_when_no_models_dir() {
        let tmp = tempdir().unwrap();
        let registry = load_models(tmp.path(), &FixtreeConfig::default()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn load_models_reads_yaml_and_json() {
        let tmp = tempdir().unwrap();
        let models_dir = tmp.path().join("models");
        write_model(
            &models_dir,
            "user.yaml",
            &ModelDef::new("User").with_association(AssociationDef::has_many("posts")),
        );
        write_model(&models_dir, "post.json", &ModelDef::new("Post"));
        fs::write(models_dir.join("README.md"), "ignored").unwrap();

        let registry = load_models(tmp.path(), &FixtreeConfig::default()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("User").is_some());
        assert!(registry.get("Post").is_some());
    }

    #[test]
    fn load_models_recursive_processes_subdirectories() {
        let tmp = tempdir().unwrap();
        write_model(
            &tmp.path().join("models/blog"),
            "comment.yml",
            &ModelDef::new("Comment"),
        );

        let registry = load_models(tmp.path(), &FixtreeConfig::default()).unwrap();
        assert_eq!(registry.models()[0].name, "Comment");
    }

    #[test]
    fn load_models_fails_on_dangling_association() {
        let tmp = tempdir().unwrap();
        write_model(
            &tmp.path().join("models"),
            "user.yaml",
            &ModelDef::new("User").with_association(AssociationDef::has_many("posts")),
        );

        let err = load_models(tmp.path(), &FixtreeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("model validation failed"));
    }

    #[test]
    fn load_models_fails_on_invalid_yaml() {
        let tmp = tempdir().unwrap();
        let models_dir = tmp.path().join("models");
        fs::create_dir_all(&models_dir).unwrap();
        fs::write(models_dir.join("broken.yaml"), "associations: 3").unwrap();

        let err = load_models_from_dir(&models_dir).unwrap_err();
        assert!(err.to_string().contains("parse YAML model"));
    }
}
