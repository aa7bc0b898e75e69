use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::models::Document;
use crate::outcome::Outcome;

/// Where whole collections are read from and written back to.
///
/// Implementations never fail outright: a read that cannot be served yields an
/// empty collection and a write that cannot be persisted is dropped, both
/// reported through [`Outcome::Degraded`].
pub trait CollectionBackend: Send + Sync {
    fn read(&self, collection: &str) -> Outcome<Vec<Document>>;

    fn write(&self, collection: &str, items: &[Document]) -> Outcome<()>;

    /// Names of the collections that have been written at least once.
    fn names(&self) -> Outcome<Vec<String>>;

    fn kind(&self) -> &'static str;
}

/// Process-local backend. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryBackend {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionBackend for MemoryBackend {
    fn read(&self, collection: &str) -> Outcome<Vec<Document>> {
        let guard = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Outcome::Complete(guard.get(collection).cloned().unwrap_or_default())
    }

    fn write(&self, collection: &str, items: &[Document]) -> Outcome<()> {
        let mut guard = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        guard.insert(collection.to_string(), items.to_vec());
        Outcome::Complete(())
    }

    fn names(&self) -> Outcome<Vec<String>> {
        let guard = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = guard.keys().cloned().collect();
        names.sort();
        Outcome::Complete(names)
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
