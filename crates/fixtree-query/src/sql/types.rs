use fixtree_core::Value;

use super::helpers::{build_query_statement, inline_query_statement};

/// Database backend for SQL generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    MySql,
    #[default]
    Sqlite,
}

/// A query ready to run against any backend
#[derive(Debug, Clone)]
pub enum BuiltQuery {
    Select(Box<sea_query::SelectStatement>),
    Insert(Box<sea_query::InsertStatement>),
    Delete(Box<sea_query::DeleteStatement>),
    Raw(RawSql),
}

/// Raw SQL that may have backend-specific variants
#[derive(Debug, Clone)]
pub struct RawSql {
    pub postgres: String,
    pub mysql: String,
    pub sqlite: String,
}

impl RawSql {
    /// Create a RawSql with the same SQL for all backends
    pub fn uniform(sql: String) -> Self {
        Self {
            postgres: sql.clone(),
            mysql: sql.clone(),
            sqlite: sql,
        }
    }

    /// Create a RawSql with different SQL for each backend
    pub fn per_backend(postgres: String, mysql: String, sqlite: String) -> Self {
        Self {
            postgres,
            mysql,
            sqlite,
        }
    }

    pub fn for_backend(&self, backend: DatabaseBackend) -> &str {
        match backend {
            DatabaseBackend::Postgres => &self.postgres,
            DatabaseBackend::MySql => &self.mysql,
            DatabaseBackend::Sqlite => &self.sqlite,
        }
    }
}

/// SQL text with its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl BuiltQuery {
    /// Build parameterized SQL for the specified database backend
    pub fn build(&self, backend: DatabaseBackend) -> Statement {
        match self {
            BuiltQuery::Select(stmt) => build_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Insert(stmt) => build_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Delete(stmt) => build_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Raw(raw) => Statement {
                sql: raw.for_backend(backend).to_string(),
                values: Vec::new(),
            },
        }
    }

    /// Build SQL with values inlined, for logging and previews
    pub fn to_sql(&self, backend: DatabaseBackend) -> String {
        match self {
            BuiltQuery::Select(stmt) => inline_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Insert(stmt) => inline_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Delete(stmt) => inline_query_statement(stmt.as_ref(), backend),
            BuiltQuery::Raw(raw) => raw.for_backend(backend).to_string(),
        }
    }
}
