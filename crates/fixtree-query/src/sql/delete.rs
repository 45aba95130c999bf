use sea_query::{Alias, Query};

use super::types::BuiltQuery;

pub fn build_delete_all(table: &str) -> BuiltQuery {
    BuiltQuery::Delete(Box::new(
        Query::delete().from_table(Alias::new(table)).to_owned(),
    ))
}
