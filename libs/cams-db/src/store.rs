use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::{CamsDocument, DocumentCollectionAdapter};

/// A resource holding a live connection that must be closed exactly once.
#[async_trait]
pub trait Closeable: Send + Sync {
    async fn close(&self);
}

/// One client connection to a document database.
pub trait DocumentStore: Closeable + 'static {
    /// Adapter for `collection`, tagging its errors with `module_name`.
    fn adapter<T: CamsDocument>(
        &self,
        module_name: &'static str,
        collection: &str,
    ) -> Arc<dyn DocumentCollectionAdapter<T>>;
}

/// Opens [`DocumentStore`]s. Each repository instance owns the store it was built with.
pub trait DocumentConnector: Send + Sync + 'static {
    type Store: DocumentStore;

    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    fn connect(&self) -> anyhow::Result<Self::Store>;
}
