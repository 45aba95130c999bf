use fixtree_core::CoreError;
use fixtree_db::DbError;
use fixtree_query::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("you must supply at least one file")]
    NoFiles,
    #[error("you must pass a template object or a path to a template file")]
    MissingTemplate,
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    File(#[from] anyhow::Error),
}
