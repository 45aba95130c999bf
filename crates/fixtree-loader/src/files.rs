use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fixtree_core::RecordSet;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::render::render;

/// Read and parse a YAML file, rendering it as a template first when
/// `render_template` is set. An empty document yields `None`.
pub fn read_yaml_file<T: DeserializeOwned>(
    path: &Path,
    render_template: bool,
) -> Result<Option<T>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read yaml file: {}", path.display()))?;
    let content = if render_template {
        render(&raw).with_context(|| format!("render yaml file: {}", path.display()))?
    } else {
        raw
    };
    debug!(path = %path.display(), bytes = content.len(), "read yaml file");

    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str::<Option<T>>(&content)
        .with_context(|| format!("parse yaml file: {}", path.display()))
}

/// Serialize `value` to `path`, creating parent directories.
///
/// In append mode document markers (`---`) are dropped so the new content
/// continues the existing document. Output holding template syntax is
/// wrapped in a raw block so reading it back with rendering on yields the
/// data unchanged.
pub fn write_yaml_file<T: Serialize + ?Sized>(path: &Path, value: &T, append: bool) -> Result<()> {
    let yaml = serde_yaml::to_string(value).context("serialize yaml")?;
    write_text(path, &escape_template_syntax(yaml), append)
}

/// Wrap `yaml` in `{% raw %}` / `{% endraw %}` tags carried on comment lines,
/// which stay valid YAML whether or not the file is rendered.
fn escape_template_syntax(yaml: String) -> String {
    if ["{{", "{%", "{#"].iter().any(|open| yaml.contains(open)) {
        format!("# {{% raw %}}\n{yaml}# {{% endraw %}}\n")
    } else {
        yaml
    }
}

/// Write a record set. Appending writes only the rows of its single class so
/// they extend the class list already in the file.
pub fn write_record_set(path: &Path, records: &RecordSet, append: bool) -> Result<()> {
    if !append {
        return write_yaml_file(path, records, false);
    }
    match records.iter().collect::<Vec<_>>().as_slice() {
        [] => Ok(()),
        [(_, rows)] => write_yaml_file(path, rows, true),
        _ => bail!(
            "cannot append {} classes to {}; use merge for multi-class trees",
            records.len(),
            path.display()
        ),
    }
}

fn write_text(path: &Path, yaml: &str, append: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory: {}", parent.display()))?;
        }
    }

    if append {
        let body: String = yaml
            .lines()
            .filter(|line| *line != "---")
            .map(|line| format!("{line}\n"))
            .collect();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open for append: {}", path.display()))?;
        file.write_all(body.as_bytes())
            .with_context(|| format!("append yaml file: {}", path.display()))?;
    } else {
        fs::write(path, yaml).with_context(|| format!("write yaml file: {}", path.display()))?;
    }
    debug!(path = %path.display(), append, "wrote yaml file");
    Ok(())
}

/// A directory yields its `*.yml*` / `*.yaml` files in name order; any other
/// path is returned as is.
pub fn collect_yaml_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let entries =
        fs::read_dir(path).with_context(|| format!("read directory: {}", path.display()))?;
    for entry in entries {
        let entry = entry.context("read directory entry")?;
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.contains(".yml") || name.ends_with(".yaml") {
            files.push(file_path);
        }
    }
    files.sort();
    Ok(files)
}
