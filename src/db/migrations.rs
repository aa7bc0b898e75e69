use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Schema required by the collection store. Applied before any file-based
/// migration so a missing migrations directory still yields a usable database.
const BASE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS collections (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Apply `.sql` files from `migrations_dir` in file-name order, once each.
///
/// Returns the number of files applied by this call.
pub fn run_migrations(conn: &Connection, migrations_dir: &Path) -> rusqlite::Result<usize> {
    tracing::debug!(dir = %migrations_dir.display(), "Checking for database migrations");

    conn.execute_batch(BASE_SCHEMA)?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let mut entries: Vec<_> = fs::read_dir(migrations_dir)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "sql"))
                .collect()
        })
        .unwrap_or_default();
    entries.sort_by_key(|e| e.file_name());

    let mut applied = 0;
    for entry in entries {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        let already_applied: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM _migrations WHERE name = ?)",
            [&*name],
            |row| row.get(0),
        )?;
        if already_applied {
            continue;
        }

        let sql = fs::read_to_string(entry.path())
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        tracing::info!(migration = %name, "Applying migration");
        conn.execute_batch(&sql)?;
        conn.execute("INSERT INTO _migrations (name) VALUES (?)", [&*name])?;
        applied += 1;
    }

    if applied > 0 {
        tracing::info!(count = applied, "Migrations applied successfully");
    }

    Ok(applied)
}
