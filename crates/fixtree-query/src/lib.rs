pub mod error;
pub mod sql;

pub use error::QueryError;
pub use sql::{
    BuiltQuery, DatabaseBackend, OrderBy, RawSql, SelectFilter, Statement, Through,
    build_delete_all, build_insert, build_reset_sequence, build_select, build_select_all,
    build_select_by, build_select_through, parse_order, quote_ident, quote_literal,
};
