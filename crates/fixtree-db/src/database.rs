use fixtree_core::Record;
use fixtree_query::{BuiltQuery, DatabaseBackend, build_reset_sequence};

use crate::error::DbError;

/// A connection fixtures are dumped from and loaded into.
pub trait Database {
    /// Dialect used to build statements for this connection.
    fn backend(&self) -> DatabaseBackend;

    /// Run a select and return every row.
    fn query(&self, query: &BuiltQuery) -> Result<Vec<Record>, DbError>;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, query: &BuiltQuery) -> Result<usize, DbError>;

    /// Column names of `table` in declaration order.
    fn columns(&self, table: &str) -> Result<Vec<String>, DbError>;

    /// Move the table's id sequence past its highest primary key.
    fn reset_sequence(&self, table: &str, primary_key: &str) -> Result<(), DbError> {
        self.execute(&build_reset_sequence(table, primary_key))?;
        Ok(())
    }
}
