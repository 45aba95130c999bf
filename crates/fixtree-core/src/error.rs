use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("duplicate model name: {0}")]
    DuplicateModel(String),
    #[error("duplicate association: {0}.{1}")]
    DuplicateAssociation(String, String),
    #[error("model not found: {0}")]
    ModelNotFound(String),
    #[error("association not found: {0}.{1}")]
    AssociationNotFound(String, String),
    #[error("association {0}.{1} references unknown model: {2}")]
    UnknownAssociationTarget(String, String, String),
    #[error("template node must have exactly one key, found {0}")]
    InvalidTemplateNode(usize),
    #[error("limit_by must name exactly one column, found {0}")]
    InvalidLimitBy(usize),
    #[error("template has no entries")]
    EmptyTemplate,
    #[error("template key not found: {0}")]
    TemplateKeyNotFound(String),
}
