use super::helpers::{quote_ident, quote_literal};
use super::types::{BuiltQuery, DatabaseBackend, RawSql};

/// Move a table's id sequence past the highest existing primary key, so the
/// next generated id follows the loaded rows.
pub fn build_reset_sequence(table: &str, primary_key: &str) -> BuiltQuery {
    let pg_table = quote_ident(table, DatabaseBackend::Postgres);
    let pg_key = quote_ident(primary_key, DatabaseBackend::Postgres);
    let postgres = format!(
        "SELECT setval(pg_get_serial_sequence({}, {}), COALESCE((SELECT MAX({pg_key}) FROM {pg_table}), 0) + 1, false)",
        quote_literal(&pg_table),
        quote_literal(primary_key),
    );

    let mysql = format!(
        "ALTER TABLE {} AUTO_INCREMENT = 1",
        quote_ident(table, DatabaseBackend::MySql)
    );

    let sqlite = format!(
        "UPDATE sqlite_sequence SET seq = (SELECT COALESCE(MAX({}), 0) FROM {}) WHERE name = {}",
        quote_ident(primary_key, DatabaseBackend::Sqlite),
        quote_ident(table, DatabaseBackend::Sqlite),
        quote_literal(table),
    );

    BuiltQuery::Raw(RawSql::per_backend(postgres, mysql, sqlite))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn mysql_resets_auto_increment() {
        let sql = build_reset_sequence("users", "id").to_sql(DatabaseBackend::MySql);
        assert_snapshot!(sql, @"ALTER TABLE `users` AUTO_INCREMENT = 1");
    }

    #[test]
    fn postgres_sets_serial_past_max() {
        let sql = build_reset_sequence("users", "id").to_sql(DatabaseBackend::Postgres);
        assert_snapshot!(sql, @r#"SELECT setval(pg_get_serial_sequence('"users"', 'id'), COALESCE((SELECT MAX("id") FROM "users"), 0) + 1, false)"#);
    }

    #[test]
    fn sqlite_updates_sqlite_sequence() {
        let sql = build_reset_sequence("users", "id").to_sql(DatabaseBackend::Sqlite);
        assert_snapshot!(sql, @r#"UPDATE sqlite_sequence SET seq = (SELECT COALESCE(MAX("id"), 0) FROM "users") WHERE name = 'users'"#);
    }
}
