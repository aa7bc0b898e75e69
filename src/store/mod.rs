//! Generic create/read/update/delete over named collections.
//!
//! Every operation reads the whole collection from the backend, changes the
//! in-memory copy and writes the whole collection back. Mutations through one
//! store are serialized; two stores (or two processes) sharing a database still
//! overwrite each other's snapshots, last write wins. A mutation whose read
//! failed is never written back.

pub mod backend;
pub mod sqlite;

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, StorageMode};
use crate::error::{AppError, AppResult};
use crate::models::record::{
    document_id, parse_timestamp, timestamp_value, CREATED_FIELD, ID_FIELD, UPDATED_FIELD,
};
use crate::models::{Document, Draft, QueryResult, Record};
use crate::outcome::{Degradation, Outcome};

pub use backend::{CollectionBackend, MemoryBackend};
pub use sqlite::{SqliteBackend, STORAGE_PREFIX};

pub struct CollectionStore {
    backend: Box<dyn CollectionBackend>,
    write_lock: Mutex<()>,
}

impl CollectionStore {
    pub fn new(backend: impl CollectionBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Open the configured backend, falling back to memory when the database
    /// cannot be reached.
    pub fn open(config: &Config) -> Self {
        match &config.storage {
            StorageMode::Memory => Self::in_memory(),
            StorageMode::Durable(path) => match SqliteBackend::open(path, &config.migrations_path)
            {
                Ok(backend) => {
                    tracing::info!(path = %path.display(), "Using durable collection store");
                    Self::new(backend)
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Durable store unavailable, collections will not persist"
                    );
                    Self::in_memory()
                }
            },
        }
    }

    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }

    pub fn collection_names(&self) -> Outcome<Vec<String>> {
        self.backend.names()
    }

    /// Insert a record, assigning `_id` and timestamps as needed.
    pub fn create<T>(&self, collection: &str, draft: Draft<T>) -> AppResult<Outcome<Record<T>>>
    where
        T: Serialize + DeserializeOwned,
    {
        let doc = into_document(&draft)?;
        self.create_document(collection, doc)
    }

    /// Insert an open-schema document. `_id` and `_createdDate` are honoured
    /// when present.
    pub fn create_document<T>(
        &self,
        collection: &str,
        mut doc: Document,
    ) -> AppResult<Outcome<Record<T>>>
    where
        T: DeserializeOwned,
    {
        let now = Utc::now();
        let created_at = match doc.get(CREATED_FIELD) {
            None | Some(Value::Null) => now,
            Some(raw) => parse_timestamp(raw).ok_or_else(|| {
                AppError::Validation(format!("{CREATED_FIELD} must be an RFC 3339 timestamp"))
            })?,
        };
        if matches!(doc.get(ID_FIELD), Some(v) if !v.is_string() && !v.is_null()) {
            return Err(AppError::Validation(format!("{ID_FIELD} must be a string")));
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut items, read_issue) = self.backend.read(collection).into_parts();

        let id = match document_id(&doc) {
            Some(id) => {
                if items.iter().any(|item| document_id(item) == Some(id)) {
                    return Err(AppError::DuplicateId {
                        collection: collection.to_string(),
                        id: id.to_string(),
                    });
                }
                id.to_string()
            }
            None => generate_id(),
        };

        doc.insert(ID_FIELD.into(), Value::String(id));
        doc.insert(CREATED_FIELD.into(), timestamp_value(created_at));
        doc.insert(UPDATED_FIELD.into(), timestamp_value(now));

        let record = decode(&doc)?;
        items.push(doc);
        let write_issue = self.persist(collection, &items, read_issue.as_ref());

        Ok(Outcome::Complete(record)
            .or_degraded(read_issue)
            .or_degraded(write_issue))
    }

    /// Every record in insertion order. Unknown collections are empty.
    pub fn get_all<T>(&self, collection: &str) -> Outcome<QueryResult<T>>
    where
        T: DeserializeOwned,
    {
        let (items, read_issue) = self.backend.read(collection).into_parts();

        let total = items.len();
        let records: Vec<Record<T>> = items.iter().filter_map(|doc| decode(doc).ok()).collect();
        let skipped = total - records.len();
        if skipped > 0 {
            tracing::warn!(collection, skipped, "Skipped records with an unexpected shape");
        }

        Outcome::Complete(QueryResult::new(records))
            .or_degraded(read_issue)
            .or_degraded((skipped > 0).then_some(Degradation::UndecodableRecords(skipped)))
    }

    /// First record whose `_id` matches, or `None`.
    pub fn get_by_id<T>(&self, collection: &str, id: &str) -> Outcome<Option<Record<T>>>
    where
        T: DeserializeOwned,
    {
        let (items, read_issue) = self.backend.read(collection).into_parts();

        let found = items.iter().find(|doc| document_id(doc) == Some(id));
        let (record, decode_issue) = match found.map(decode) {
            None => (None, None),
            Some(Ok(record)) => (Some(record), None),
            Some(Err(_)) => (None, Some(Degradation::UndecodableRecords(1))),
        };

        Outcome::Complete(record)
            .or_degraded(read_issue)
            .or_degraded(decode_issue)
    }

    /// Merge `patch` into the stored record with the same `_id`.
    ///
    /// Fields in the patch replace stored ones; everything else is kept.
    /// `_createdDate` never changes and `_updatedDate` is refreshed.
    pub fn update<T, P>(&self, collection: &str, patch: &P) -> AppResult<Outcome<Record<T>>>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let patch = into_document(patch)?;
        let id = document_id(&patch).ok_or(AppError::MissingId)?.to_string();

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut items, read_issue) = self.backend.read(collection).into_parts();

        let idx = position(&items, collection, &id)?;
        let mut merged = items[idx].clone();
        for (key, value) in patch {
            if key != CREATED_FIELD && key != UPDATED_FIELD {
                merged.insert(key, value);
            }
        }

        let now = match merged.get(UPDATED_FIELD).and_then(parse_timestamp) {
            Some(previous) => Utc::now().max(previous),
            None => Utc::now(),
        };
        merged.insert(UPDATED_FIELD.into(), timestamp_value(now));

        let record = decode(&merged)?;
        items[idx] = merged;
        let write_issue = self.persist(collection, &items, read_issue.as_ref());

        Ok(Outcome::Complete(record)
            .or_degraded(read_issue)
            .or_degraded(write_issue))
    }

    /// Remove the record with `id` and hand it back.
    pub fn delete<T>(&self, collection: &str, id: &str) -> AppResult<Outcome<Record<T>>>
    where
        T: DeserializeOwned,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut items, read_issue) = self.backend.read(collection).into_parts();

        let idx = position(&items, collection, id)?;
        let record = decode(&items[idx])?;
        items.remove(idx);
        let write_issue = self.persist(collection, &items, read_issue.as_ref());

        Ok(Outcome::Complete(record)
            .or_degraded(read_issue)
            .or_degraded(write_issue))
    }

    /// Write `items` back unless the read they were built from failed, in
    /// which case the stored collection is left alone.
    fn persist(
        &self,
        collection: &str,
        items: &[Document],
        read_issue: Option<&Degradation>,
    ) -> Option<Degradation> {
        if let Some(Degradation::StorageRead(cause)) = read_issue {
            tracing::warn!(collection, %cause, "Collection was not readable, skipping write");
            return Some(Degradation::StorageWrite(format!(
                "skipped after failed read: {cause}"
            )));
        }
        self.backend.write(collection, items).reason().cloned()
    }
}

fn position(items: &[Document], collection: &str, id: &str) -> AppResult<usize> {
    items
        .iter()
        .position(|doc| document_id(doc) == Some(id))
        .ok_or_else(|| AppError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
}

fn into_document<P: Serialize + ?Sized>(value: &P) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(doc) => Ok(doc),
        _ => Err(AppError::Validation(
            "record must serialize to a JSON object".into(),
        )),
    }
}

fn decode<T: DeserializeOwned>(doc: &Document) -> AppResult<Record<T>> {
    Ok(serde_json::from_value(Value::Object(doc.clone()))?)
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
