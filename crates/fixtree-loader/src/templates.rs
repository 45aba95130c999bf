use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fixtree_config::FileFormat;
use fixtree_core::Template;

/// Load a traversal template from a JSON or YAML file.
///
/// The file is parsed as written. `sanitize` values are tera templates that
/// are rendered later against each collected row.
pub fn load_template(path: &Path) -> Result<Template> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read template: {}", path.display()))?;

    let template: Template = match FileFormat::from_path(path) {
        Some(FileFormat::Json) => serde_json::from_str(&content)
            .with_context(|| format!("parse JSON template: {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("parse YAML template: {}", path.display()))?,
    };
    Ok(template)
}
