//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use gallery_core::{Error, Result};
use rusqlite::Connection;

/// V1: photos, collections, and the ordered membership join table.
const V1_INITIAL: &str = r#"
CREATE TABLE photo (
    id            INTEGER NOT NULL PRIMARY KEY,
    filename      TEXT NOT NULL UNIQUE,
    thumbnail     TEXT NOT NULL UNIQUE,
    date_taken    TEXT,
    lens          TEXT,
    focal_length  TEXT,
    f_stop        TEXT,
    exposure_time TEXT,
    iso           TEXT,
    camera_model  TEXT
);

CREATE TABLE collection (
    id   INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE photo_collection (
    photo_id      INTEGER NOT NULL REFERENCES photo(id) ON DELETE CASCADE,
    collection_id INTEGER NOT NULL REFERENCES collection(id) ON DELETE CASCADE,
    sort_order    INTEGER NOT NULL CHECK (sort_order > 0),
    PRIMARY KEY (photo_id, collection_id)
);

CREATE INDEX idx_photo_collection_order ON photo_collection(collection_id, sort_order);
"#;

/// Ordered list of (version, name, sql) entries.
const MIGRATIONS: &[(i64, &str, &str)] = &[(1, "initial", V1_INITIAL)];

fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY NOT NULL,
            name       TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))
}

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
///
/// Returns the number of migrations applied. A database already at a
/// version this build does not know is refused rather than written to.
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    let found = current_version(conn)?;
    if found > latest_version() {
        return Err(Error::database(format!(
            "database schema V{found} is newer than the supported V{}",
            latest_version()
        )));
    }

    let mut applied = 0;
    for &(version, name, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?1)",
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
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            rusqlite::params![version, name],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::info!(version, name, "Applied migration");
        applied += 1;
    }

    Ok(applied)
}

/// Get the current schema version without applying migrations.
pub fn current_version(conn: &Connection) -> Result<i64> {
    init_migrations_table(conn)?;
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Get the latest available migration version.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|&(v, _, _)| v).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), MIGRATIONS.len());
        // second call is a no-op
        assert_eq!(run_migrations(&conn).unwrap(), 0);
        assert_eq!(current_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn test_fresh_database_is_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_newer_schema_refused() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, 'future')",
            [latest_version() + 1],
        )
        .unwrap();

        let err = run_migrations(&conn).unwrap_err();
        assert!(err.to_string().contains("newer"));
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        let tables = ["photo", "collection", "photo_collection", "schema_migrations"];
        for t in &tables {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                    [t],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "table {t} should exist");
        }
    }

    #[test]
    fn test_sort_order_must_be_positive() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO photo (id, filename, thumbnail) VALUES (1, 'a.jpg', 'a-thumb.avif');
             INSERT INTO collection (id, name) VALUES (1, 'c');",
        )
        .unwrap();
        let res = conn.execute(
            "INSERT INTO photo_collection (photo_id, collection_id, sort_order) VALUES (1, 1, 0)",
            [],
        );
        assert!(res.is_err());
    }
}
