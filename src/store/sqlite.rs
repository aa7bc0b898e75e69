use std::path::Path;

use crate::db::queries::collections;
use crate::db::{create_pool, migrations, DbPool};
use crate::error::AppResult;
use crate::models::Document;
use crate::outcome::{Degradation, Outcome};
use crate::store::backend::CollectionBackend;

/// Namespace for collection keys, shared with the browser build of the app.
pub const STORAGE_PREFIX: &str = "mint-ai-cms:";

/// Durable backend: each collection is one JSON array in the `collections` table.
pub struct SqliteBackend {
    pool: DbPool,
}

impl SqliteBackend {
    /// Open (creating if needed) the database at `path` and bring its schema up to date.
    pub fn open(path: &Path, migrations_dir: &Path) -> AppResult<Self> {
        let pool = create_pool(path)?;
        Self::from_pool(pool, migrations_dir)
    }

    pub fn from_pool(pool: DbPool, migrations_dir: &Path) -> AppResult<Self> {
        {
            let conn = pool.get()?;
            migrations::run_migrations(&conn, migrations_dir)?;
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn key(collection: &str) -> String {
        format!("{STORAGE_PREFIX}{collection}")
    }

    fn try_read(&self, collection: &str) -> Result<Vec<Document>, String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        let raw = collections::get_collection(&conn, &Self::key(collection))
            .map_err(|e| e.to_string())?;
        match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| format!("corrupt JSON: {e}")),
            None => Ok(Vec::new()),
        }
    }

    fn try_write(&self, collection: &str, items: &[Document]) -> Result<(), String> {
        let raw = serde_json::to_string(items).map_err(|e| e.to_string())?;
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        collections::put_collection(&conn, &Self::key(collection), &raw).map_err(|e| e.to_string())
    }
}

impl CollectionBackend for SqliteBackend {
    fn read(&self, collection: &str) -> Outcome<Vec<Document>> {
        match self.try_read(collection) {
            Ok(items) => Outcome::Complete(items),
            Err(cause) => {
                tracing::warn!(collection, %cause, "Failed to read collection, treating it as empty");
                Outcome::degraded(Vec::new(), Degradation::StorageRead(cause))
            }
        }
    }

    fn write(&self, collection: &str, items: &[Document]) -> Outcome<()> {
        match self.try_write(collection, items) {
            Ok(()) => Outcome::Complete(()),
            Err(cause) => {
                tracing::warn!(collection, %cause, "Failed to write collection, change dropped");
                Outcome::degraded((), Degradation::StorageWrite(cause))
            }
        }
    }

    fn names(&self) -> Outcome<Vec<String>> {
        let listed = self
            .pool
            .get()
            .map_err(|e| e.to_string())
            .and_then(|conn| collections::list_keys(&conn).map_err(|e| e.to_string()));

        match listed {
            Ok(keys) => Outcome::Complete(
                keys.iter()
                    .filter_map(|k| k.strip_prefix(STORAGE_PREFIX))
                    .map(String::from)
                    .collect(),
            ),
            Err(cause) => {
                tracing::warn!(%cause, "Failed to list collections");
                Outcome::degraded(Vec::new(), Degradation::StorageRead(cause))
            }
        }
    }

    fn kind(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_in_memory_pool;
    use serde_json::json;

    fn backend() -> SqliteBackend {
        SqliteBackend::from_pool(create_in_memory_pool().unwrap(), Path::new("does/not/exist"))
            .unwrap()
    }

    #[test]
    fn test_write_then_read() {
        let backend = backend();
        let items = vec![json!({ "_id": "a", "n": 1 }).as_object().cloned().unwrap()];

        assert!(!backend.write("notes", &items).is_degraded());
        assert_eq!(backend.read("notes").into_inner(), items);
        assert_eq!(backend.names().into_inner(), vec!["notes".to_string()]);
    }

    #[test]
    fn test_keys_are_namespaced() {
        let backend = backend();
        backend.write("notes", &[]).into_inner();

        let conn = backend.pool().get().unwrap();
        let keys = collections::list_keys(&conn).unwrap();
        assert_eq!(keys, vec![format!("{STORAGE_PREFIX}notes")]);
    }

    #[test]
    fn test_foreign_keys_are_not_listed() {
        let backend = backend();
        {
            let conn = backend.pool().get().unwrap();
            collections::put_collection(&conn, "other-app:settings", "[]").unwrap();
        }
        assert!(backend.names().into_inner().is_empty());
    }
}
