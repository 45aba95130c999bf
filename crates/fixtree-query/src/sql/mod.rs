pub mod delete;
pub mod filter;
pub mod helpers;
pub mod insert;
pub mod select;
pub mod sequence;
pub mod types;

pub use delete::build_delete_all;
pub use filter::{OrderBy, SelectFilter, parse_order};
pub use helpers::*;
pub use insert::build_insert;
pub use select::{Through, build_select, build_select_all, build_select_by, build_select_through};
pub use sequence::build_reset_sequence;
pub use types::{BuiltQuery, DatabaseBackend, RawSql, Statement};
