use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid order clause '{0}': {1}")]
    InvalidOrder(String, String),
    #[error("{0}")]
    Other(String),
}
