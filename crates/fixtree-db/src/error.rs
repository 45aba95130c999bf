use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
