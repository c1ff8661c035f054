use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use secrecy::ExposeSecret;
use tracing::info;

use super::adapter::MongoCollectionAdapter;
use crate::adapter::{CamsDocument, DocumentCollectionAdapter};
use crate::config::DocumentDbConfig;
use crate::store::{Closeable, DocumentConnector, DocumentStore};

/// Builds one MongoDB client per [`DocumentConnector::connect`] call from options parsed
/// once at startup.
#[derive(Clone)]
pub struct MongoConnector {
    options: ClientOptions,
    database: String,
}

impl MongoConnector {
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed.
    pub async fn from_config(config: &DocumentDbConfig) -> anyhow::Result<Self> {
        let mut options = ClientOptions::parse(config.connection_string.expose_secret())
            .await
            .context("invalid document database connection string")?;
        if let Some(app_name) = &config.app_name {
            options.app_name = Some(app_name.clone());
        }
        Ok(Self {
            options,
            database: config.database_name.clone(),
        })
    }
}

impl DocumentConnector for MongoConnector {
    type Store = MongoDocumentStore;

    fn connect(&self) -> anyhow::Result<MongoDocumentStore> {
        let client = Client::with_options(self.options.clone())
            .context("failed to create document database client")?;
        let database = client.database(&self.database);
        info!(database = %self.database, "document database client created");
        Ok(MongoDocumentStore { client, database })
    }
}

pub struct MongoDocumentStore {
    client: Client,
    database: Database,
}

#[async_trait]
impl Closeable for MongoDocumentStore {
    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!(database = %self.database.name(), "document database client closed");
    }
}

impl DocumentStore for MongoDocumentStore {
    fn adapter<T: CamsDocument>(
        &self,
        module_name: &'static str,
        collection: &str,
    ) -> Arc<dyn DocumentCollectionAdapter<T>> {
        Arc::new(MongoCollectionAdapter::<T>::new(
            self.database.collection(collection),
            module_name,
        ))
    }
}
