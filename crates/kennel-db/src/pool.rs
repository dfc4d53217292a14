//! Connection pool management for SQLite via r2d2.

use std::sync::atomic::{AtomicU64, Ordering};

use kennel_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;

/// Pragmas applied to every connection. WAL only makes sense on disk.
fn pragmas(wal: bool) -> &'static str {
    if wal {
        "PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;"
    } else {
        "PRAGMA foreign_keys = ON;"
    }
}

/// Build a pool over `manager` and bring its schema up to date.
fn build_migrated(manager: SqliteConnectionManager, what: &str) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create {what}: {e}")))?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;
    drop(conn);
    Ok(pool)
}

/// Open (creating if needed) the SQLite file at `db_path` and migrate it.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch(pragmas(true)));
    build_migrated(manager, "connection pool")
}

/// A migrated in-memory database.
///
/// Every call gets its own shared-cache database, so pools never see each
/// other's rows while connections within one pool do.
pub fn init_memory_pool() -> Result<DbPool> {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let uri = format!(
        "file:kennel_memdb_{}_{}?mode=memory&cache=shared",
        NEXT.fetch_add(1, Ordering::Relaxed),
        std::process::id()
    );

    let manager =
        SqliteConnectionManager::file(uri).with_init(|conn| conn.execute_batch(pragmas(false)));
    build_migrated(manager, "in-memory pool")
}

/// Check a connection out of `pool`.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
