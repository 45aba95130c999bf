use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use fixtree_config::FileFormat;
use fixtree_core::ModelDef;
use fixtree_naming::underscore;
use serde_json::Value;

use crate::utils::load_project;

pub fn cmd_new(root: Option<&Path>, name: String, format: Option<FileFormat>) -> Result<()> {
    let (root, config) = load_project(root)?;
    let format = format.unwrap_or(config.model_format());
    let dir = root.join(config.models_dir());
    if !dir.exists() {
        fs::create_dir_all(&dir).context("create models directory")?;
    }

    let path = dir.join(format!("{}.{}", underscore(&name), format.extension()));
    if path.exists() {
        bail!("model file already exists: {}", path.display());
    }

    let model = ModelDef::new(name);
    let schema_url = schema_url();
    match format {
        FileFormat::Json => write_json_with_schema(&path, &model, &schema_url)?,
        FileFormat::Yaml | FileFormat::Yml => write_yaml(&path, &model, &schema_url)?,
    }

    println!("Created model template: {}", path.display());
    Ok(())
}

fn schema_url() -> String {
    // Override with FIXTREE_SCHEMA_BASE_URL to point at a local checkout.
    let base = std::env::var("FIXTREE_SCHEMA_BASE_URL").ok();
    let base = base.as_deref().unwrap_or(
        "https://raw.githubusercontent.com/fixtree/fixtree/refs/heads/main/schemas",
    );
    format!("{}/model.schema.json", base.trim_end_matches('/'))
}

fn write_json_with_schema(path: &Path, model: &ModelDef, schema_url: &str) -> Result<()> {
    let mut value = serde_json::to_value(model).context("serialize model to json")?;
    if let Value::Object(ref mut map) = value {
        map.insert("$schema".to_string(), Value::String(schema_url.to_string()));
    }
    let text = serde_json::to_string_pretty(&value).context("stringify json with schema")?;
    fs::write(path, text).with_context(|| format!("write file: {}", path.display()))?;
    Ok(())
}

fn write_yaml(path: &Path, model: &ModelDef, schema_url: &str) -> Result<()> {
    let text = serde_yaml::to_string(model).context("serialize model to yaml")?;
    let text = format!("# yaml-language-server: $schema={schema_url}\n{text}");
    fs::write(path, text).with_context(|| format!("write file: {}", path.display()))?;
    Ok(())
}
