pub mod database;
pub mod error;
pub mod sqlite;

pub use database::Database;
pub use error::DbError;
pub use sqlite::SqliteDatabase;
