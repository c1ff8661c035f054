use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value as Json;

use super::adapter::InMemoryCollectionAdapter;
use crate::adapter::{CamsDocument, DocumentCollectionAdapter};
use crate::store::{Closeable, DocumentConnector, DocumentStore};

/// Named collections of JSON documents shared by every handle cloned from it.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    collections: Arc<Mutex<HashMap<String, Vec<Json>>>>,
}

impl InMemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to `collection`, creating it if needed.
    pub(super) fn with_collection<R>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Vec<Json>) -> R,
    ) -> R {
        let mut collections = self.collections.lock();
        f(collections.entry(collection.to_owned()).or_default())
    }

    /// Copy of the documents currently in `collection`.
    #[must_use]
    pub fn snapshot(&self, collection: &str) -> Vec<Json> {
        self.collections
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the contents of `collection`.
    pub fn seed(&self, collection: &str, documents: Vec<Json>) {
        self.collections
            .lock()
            .insert(collection.to_owned(), documents);
    }
}

/// Hands out [`InMemoryDocumentStore`]s over one shared [`InMemoryDatabase`] and counts
/// opened and closed stores.
#[derive(Clone, Default)]
pub struct InMemoryConnector {
    database: InMemoryDatabase,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl InMemoryConnector {
    #[must_use]
    pub fn new(database: InMemoryDatabase) -> Self {
        Self {
            database,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn database(&self) -> &InMemoryDatabase {
        &self.database
    }

    #[must_use]
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl DocumentConnector for InMemoryConnector {
    type Store = InMemoryDocumentStore;

    fn connect(&self) -> anyhow::Result<InMemoryDocumentStore> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryDocumentStore {
            database: self.database.clone(),
            closed: Arc::clone(&self.closed),
        })
    }
}

pub struct InMemoryDocumentStore {
    database: InMemoryDatabase,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl Closeable for InMemoryDocumentStore {
    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn adapter<T: CamsDocument>(
        &self,
        module_name: &'static str,
        collection: &str,
    ) -> Arc<dyn DocumentCollectionAdapter<T>> {
        Arc::new(InMemoryCollectionAdapter::<T>::new(
            self.database.clone(),
            collection,
            module_name,
        ))
    }
}
