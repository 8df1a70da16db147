//! Connection pool management for SQLite via r2d2.

use std::sync::atomic::{AtomicU64, Ordering};

use gallery_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// How long a writer waits for the database lock before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Connections per pool. The CLI needs one; the pipeline and the
/// concurrency tests hold a few at once.
const POOL_SIZE: u32 = 4;

/// Open the gallery database file, creating and migrating it if needed.
///
/// Every connection gets foreign keys (memberships cascade with their photo
/// or collection), WAL, and a busy timeout. The timeout makes a second
/// writer queue behind a membership append's IMMEDIATE lock instead of
/// failing with `SQLITE_BUSY`.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};
             PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;"
        ))
    });

    let pool = migrated_pool(manager)?;
    tracing::debug!(path = db_path, "Gallery database ready");
    Ok(pool)
}

/// Open a private in-memory gallery database.
///
/// Pipeline tests hand this pool to a `Processor`, whose blocking workers
/// take their own connections; the named shared-cache URI lets all of them
/// see the same photos and collections. The counter keeps pools from
/// different tests apart.
pub fn init_memory_pool() -> Result<DbPool> {
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);

    let manager =
        SqliteConnectionManager::file(format!("file:gallery_memdb_{n}?mode=memory&cache=shared"))
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    migrated_pool(manager)
}

fn migrated_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;
    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
