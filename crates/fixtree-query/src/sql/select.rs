use fixtree_core::Value;
use sea_query::{Alias, Asterisk, Expr, Query};

use super::filter::{SelectFilter, column};
use super::helpers::to_sea_value;
use super::types::BuiltQuery;

/// Join table columns for a many-to-many lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Through<'a> {
    pub join_table: &'a str,
    /// Join column pointing at the owner row.
    pub owner_key: &'a str,
    /// Join column pointing at the target row.
    pub target_key: &'a str,
}

pub fn build_select(table: &str, filter: &SelectFilter) -> BuiltQuery {
    let mut stmt = Query::select();
    stmt.column(Asterisk).from(Alias::new(table));
    filter.apply(&mut stmt);
    BuiltQuery::Select(Box::new(stmt))
}

pub fn build_select_all(table: &str) -> BuiltQuery {
    build_select(table, &SelectFilter::default())
}

/// Rows of `table` whose `column` equals `value`, then the filter.
pub fn build_select_by(
    table: &str,
    column_name: &str,
    value: &Value,
    filter: &SelectFilter,
) -> BuiltQuery {
    let mut stmt = Query::select();
    stmt.column(Asterisk)
        .from(Alias::new(table))
        .and_where(column(column_name).eq(to_sea_value(value)));
    filter.apply(&mut stmt);
    BuiltQuery::Select(Box::new(stmt))
}

/// Rows of `table` linked to `owner_value` through a join table.
pub fn build_select_through(
    table: &str,
    primary_key: &str,
    through: &Through<'_>,
    owner_value: &Value,
    filter: &SelectFilter,
) -> BuiltQuery {
    let linked = Query::select()
        .column(Alias::new(through.target_key))
        .from(Alias::new(through.join_table))
        .and_where(Expr::col(Alias::new(through.owner_key)).eq(to_sea_value(owner_value)))
        .to_owned();

    let mut stmt = Query::select();
    stmt.column(Asterisk)
        .from(Alias::new(table))
        .and_where(Expr::col(Alias::new(primary_key)).in_subquery(linked));
    filter.apply(&mut stmt);
    BuiltQuery::Select(Box::new(stmt))
}
