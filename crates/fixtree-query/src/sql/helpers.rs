use fixtree_core::Value;
use sea_query::{
    MysqlQueryBuilder, PostgresQueryBuilder, QueryStatementWriter, SqliteQueryBuilder,
    Value as SeaValue,
};

use super::types::{DatabaseBackend, Statement};

/// Helper function to build a query statement with bind values for the given backend
pub fn build_query_statement<T: QueryStatementWriter>(
    stmt: &T,
    backend: DatabaseBackend,
) -> Statement {
    let (sql, values) = match backend {
        DatabaseBackend::Postgres => stmt.build(PostgresQueryBuilder),
        DatabaseBackend::MySql => stmt.build(MysqlQueryBuilder),
        DatabaseBackend::Sqlite => stmt.build(SqliteQueryBuilder),
    };
    Statement {
        sql,
        values: values.0.into_iter().map(from_sea_value).collect(),
    }
}

/// Helper function to build a query statement with values inlined
pub fn inline_query_statement<T: QueryStatementWriter>(
    stmt: &T,
    backend: DatabaseBackend,
) -> String {
    match backend {
        DatabaseBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        DatabaseBackend::MySql => stmt.to_string(MysqlQueryBuilder),
        DatabaseBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
    }
}

/// Quote an identifier for raw SQL.
pub fn quote_ident(name: &str, backend: DatabaseBackend) -> String {
    match backend {
        DatabaseBackend::MySql => format!("`{}`", name.replace('`', "``")),
        DatabaseBackend::Postgres | DatabaseBackend::Sqlite => {
            format!("\"{}\"", name.replace('"', "\"\""))
        }
    }
}

/// Quote a string literal for raw SQL.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

pub fn to_sea_value(value: &Value) -> SeaValue {
    match value {
        Value::Null => SeaValue::String(None),
        Value::Bool(v) => (*v).into(),
        Value::Integer(v) => (*v).into(),
        Value::Real(v) => (*v).into(),
        Value::Text(v) => v.as_str().into(),
        Value::Blob(v) => v.clone().into(),
    }
}

#[allow(unreachable_patterns)]
pub fn from_sea_value(value: SeaValue) -> Value {
    match value {
        SeaValue::Bool(v) => v.into(),
        SeaValue::TinyInt(v) => v.map(i64::from).into(),
        SeaValue::SmallInt(v) => v.map(i64::from).into(),
        SeaValue::Int(v) => v.map(i64::from).into(),
        SeaValue::BigInt(v) => v.into(),
        SeaValue::TinyUnsigned(v) => v.map(i64::from).into(),
        SeaValue::SmallUnsigned(v) => v.map(i64::from).into(),
        SeaValue::Unsigned(v) => v.map(i64::from).into(),
        SeaValue::BigUnsigned(v) => v
            .map(|n| i64::try_from(n).map_or(Value::Real(n as f64), Value::Integer))
            .into(),
        SeaValue::Float(v) => v.map(f64::from).into(),
        SeaValue::Double(v) => v.into(),
        SeaValue::String(v) => v.map(|s| s.to_string()).into(),
        SeaValue::Char(v) => v.map(|c| c.to_string()).into(),
        SeaValue::Bytes(v) => v.map(|b| Value::Blob(b.to_vec())).into(),
        _ => Value::Null,
    }
}
