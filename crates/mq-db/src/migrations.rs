//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use rusqlite::Connection;
use mq_core::{Error, Result};

/// V1: category and menu tables.
const V1_INITIAL: &str = r#"
CREATE TABLE tbl_category (
    category_code     INTEGER PRIMARY KEY,
    category_name     TEXT NOT NULL,
    ref_category_code INTEGER REFERENCES tbl_category(category_code)
);

CREATE TABLE tbl_menu (
    menu_code        INTEGER PRIMARY KEY,
    menu_name        TEXT NOT NULL,
    menu_price       INTEGER NOT NULL,
    category_code    INTEGER NOT NULL REFERENCES tbl_category(category_code),
    orderable_status TEXT NOT NULL DEFAULT 'Y' CHECK (orderable_status IN ('Y', 'N'))
);
"#;

/// V2: lookup indexes for the filter patterns the menu screens use.
const V2_MENU_INDEXES: &str = r#"
CREATE INDEX idx_menu_category ON tbl_menu(category_code);
CREATE INDEX idx_menu_name ON tbl_menu(menu_name);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL), (2, V2_MENU_INDEXES)];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;
        tracing::debug!(version, "applied migration");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        // second call is a no-op
        run_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        for t in &["tbl_category", "tbl_menu", "schema_migrations"] {
            let exists: bool = conn
                .query_row(
                    "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                    [t],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "table {t} should exist");
        }
    }

    #[test]
    fn test_orderable_status_is_checked() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO tbl_category (category_code, category_name) VALUES (1, '식사')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO tbl_menu VALUES (1, '테스트', 1000, 1, 'X')",
            [],
        );
        assert!(result.is_err());
    }
}
