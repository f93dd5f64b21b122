//! r2d2 pool of SQLite connections holding the menu schema.
//!
//! Every pool handed out by this module has already run the menu
//! migrations, so a session opened on it can query `tbl_menu` and
//! `tbl_category` straight away.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use mq_core::{Error, Result};

use crate::migrations;

/// Pool shared by every [`SessionFactory`](crate::session::SessionFactory).
pub type DbPool = Pool<SqliteConnectionManager>;

/// Connection checked out for the lifetime of one session.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Connections kept by the in-memory pool and by the default config.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Open the menu database at `db_path` with up to `max_size` connections.
///
/// The file is created when missing. Connections run with foreign keys on,
/// so a menu cannot point at a category that does not exist, and in WAL
/// mode so page reads do not block the seeder.
pub fn init_pool(db_path: &str, max_size: u32) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;",
        )
    });
    build_migrated(manager, max_size)
}

/// Private in-memory menu database for one test.
///
/// Each call gets its own shared-cache database name. Sessions from the same
/// pool see each other's rows; sessions from two pools never do.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:menudb_{n}?mode=memory&cache=shared");

    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    build_migrated(manager, DEFAULT_POOL_SIZE)
}

fn build_migrated(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("cannot open menu database: {e}")))?;

    // The first connection stays checked out while the schema is applied.
    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;
    drop(conn);

    tracing::debug!(max_size, "menu database pool ready");
    Ok(pool)
}

/// Check out a connection, mapping pool exhaustion to a database error.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("no menu database connection available: {e}")))
}
