use fixtree_core::Record;
use sea_query::{Alias, Query, SimpleExpr};

use super::helpers::to_sea_value;
use super::types::BuiltQuery;
use crate::error::QueryError;

/// Insert one row, every column taken verbatim from the record.
pub fn build_insert(table: &str, record: &Record) -> Result<BuiltQuery, QueryError> {
    let mut stmt = Query::insert();
    stmt.into_table(Alias::new(table));
    if record.is_empty() {
        stmt.or_default_values();
    } else {
        stmt.columns(record.keys().map(Alias::new));
        stmt.values(record.values().map(|v| SimpleExpr::from(to_sea_value(v))))
            .map_err(|e| QueryError::Other(format!("insert into {table}: {e}")))?;
    }
    Ok(BuiltQuery::Insert(Box::new(stmt)))
}
