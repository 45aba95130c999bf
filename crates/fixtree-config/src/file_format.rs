use std::path::Path;

#[cfg(feature = "cli")]
use clap::ValueEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported formats for model and template files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Json,
    Yaml,
    Yml,
}

impl Default for FileFormat {
    fn default() -> Self {
        FileFormat::Yaml
    }
}

impl FileFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Some(FileFormat::Json),
            Some("yaml") => Some(FileFormat::Yaml),
            Some("yml") => Some(FileFormat::Yml),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
            FileFormat::Yml => "yml",
        }
    }

    pub fn is_json(self) -> bool {
        matches!(self, FileFormat::Json)
    }
}
