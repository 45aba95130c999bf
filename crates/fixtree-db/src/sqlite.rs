use std::path::Path;

use fixtree_core::{Record, Value};
use fixtree_query::{BuiltQuery, DatabaseBackend, quote_ident};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use tracing::debug;

use crate::database::Database;
use crate::error::DbError;

/// A SQLite database file (or in-memory database).
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened sqlite database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Run several `;`-separated statements, e.g. a schema.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table_exists(&self, table: &str) -> Result<bool, DbError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl Database for SqliteDatabase {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Sqlite
    }

    fn query(&self, query: &BuiltQuery) -> Result<Vec<Record>, DbError> {
        let stmt = query.build(DatabaseBackend::Sqlite);
        debug!(sql = %stmt.sql, params = stmt.values.len(), "query");

        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let names: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let mut rows = prepared.query(params_from_iter(stmt.values.iter().map(to_sql_value)))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Record::new();
            for (idx, name) in names.iter().enumerate() {
                record.insert(name.clone(), from_value_ref(row.get_ref(idx)?));
            }
            records.push(record);
        }
        Ok(records)
    }

    fn execute(&self, query: &BuiltQuery) -> Result<usize, DbError> {
        let stmt = query.build(DatabaseBackend::Sqlite);
        debug!(sql = %stmt.sql, params = stmt.values.len(), "execute");
        let affected = self
            .conn
            .execute(&stmt.sql, params_from_iter(stmt.values.iter().map(to_sql_value)))?;
        Ok(affected)
    }

    fn columns(&self, table: &str) -> Result<Vec<String>, DbError> {
        let sql = format!(
            "PRAGMA table_info({})",
            quote_ident(table, DatabaseBackend::Sqlite)
        );
        let mut prepared = self.conn.prepare(&sql)?;
        let columns = prepared
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(DbError::TableNotFound(table.to_string()));
        }
        Ok(columns)
    }

    fn reset_sequence(&self, table: &str, primary_key: &str) -> Result<(), DbError> {
        // Only AUTOINCREMENT tables create sqlite_sequence.
        if !self.table_exists("sqlite_sequence")? {
            debug!(table, "no sqlite_sequence, skipping sequence reset");
            return Ok(());
        }
        self.execute(&fixtree_query::build_reset_sequence(table, primary_key))?;
        Ok(())
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
        Value::Integer(v) => SqlValue::Integer(*v),
        Value::Real(v) => SqlValue::Real(*v),
        Value::Text(v) => SqlValue::Text(v.clone()),
        Value::Blob(v) => SqlValue::Blob(v.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
        ValueRef::Blob(v) => Value::Blob(v.to_vec()),
    }
}
