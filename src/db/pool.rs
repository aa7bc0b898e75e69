use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Duration;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn create_pool(database_path: &Path) -> Result<DbPool, r2d2::Error> {
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
        )
    });

    Pool::builder()
        .max_size(4)
        .connection_timeout(Duration::from_secs(5))
        .build(manager)
}

/// A single-connection pool over a private in-memory database.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// capped at one connection to keep all callers on the same data.
pub fn create_in_memory_pool() -> Result<DbPool, r2d2::Error> {
    Pool::builder()
        .max_size(1)
        .build(SqliteConnectionManager::memory())
}
