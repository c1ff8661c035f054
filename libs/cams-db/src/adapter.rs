use async_trait::async_trait;
use cams_query::{ConditionOrConjunction, Pipeline, Schema, SortSpec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record type that can be stored in a document collection.
pub trait CamsDocument: Schema + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> CamsDocument for T where T: Schema + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Field enum of a stored record.
pub type FieldOf<T> = <T as Schema>::Field;

/// Top-level attributes to set on a matched document.
pub type DocumentPatch = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceResult {
    /// Id of the written document.
    pub id: String,
    pub modified_count: u64,
    pub upserted_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub metadata: PaginationMetadata,
    pub data: Vec<T>,
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self {
            metadata: PaginationMetadata { total: 0 },
            data: Vec::new(),
        }
    }
}

impl<T: DeserializeOwned> PaginatedResponse<T> {
    /// Build a response from the single facet document produced by a paginated pipeline:
    /// `{ "metadata": [{ "total": n }], "data": [ ... ] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if a data item does not deserialize into `T`.
    pub fn from_facet(results: Vec<serde_json::Value>) -> anyhow::Result<Self> {
        let Some(mut facet) = results.into_iter().next() else {
            return Ok(Self::default());
        };
        let total = facet
            .pointer("/metadata/0/total")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_default();
        let data = match facet.get_mut("data").map(serde_json::Value::take) {
            Some(serde_json::Value::Array(items)) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()?,
            _ => Vec::new(),
        };
        Ok(Self {
            metadata: PaginationMetadata { total },
            data,
        })
    }
}

/// Typed access to one document collection.
///
/// Implementations tag every failure with their module name through
/// `cams_errors::get_cams_error`, so callers can rely on downcasting to `CamsError`.
#[async_trait]
pub trait DocumentCollectionAdapter<T: CamsDocument>: Send + Sync {
    /// Documents matching `query` (all documents when `None`) in `sort` order.
    async fn find(
        &self,
        query: Option<ConditionOrConjunction<FieldOf<T>>>,
        sort: Option<SortSpec<FieldOf<T>>>,
    ) -> anyhow::Result<Vec<T>>;

    async fn get_all(&self, sort: Option<SortSpec<FieldOf<T>>>) -> anyhow::Result<Vec<T>> {
        self.find(None, sort).await
    }

    async fn find_one(&self, query: ConditionOrConjunction<FieldOf<T>>)
    -> anyhow::Result<Option<T>>;

    /// Insert `item` under a freshly generated `id`, returning that id.
    async fn insert_one(&self, item: T) -> anyhow::Result<String>;

    /// Insert all `items`, returning their generated ids in input order.
    async fn insert_many(&self, items: Vec<T>) -> anyhow::Result<Vec<String>>;

    /// Replace the first document matching `query`. The item keeps its `id` if it has one.
    async fn replace_one(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
        item: T,
        upsert: bool,
    ) -> anyhow::Result<ReplaceResult>;

    /// Set the attributes in `patch` on the first document matching `query`.
    async fn update_one(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
        patch: DocumentPatch,
    ) -> anyhow::Result<UpdateResult>;

    async fn delete_one(&self, query: ConditionOrConjunction<FieldOf<T>>) -> anyhow::Result<u64>;

    async fn delete_many(&self, query: ConditionOrConjunction<FieldOf<T>>)
    -> anyhow::Result<u64>;

    async fn count_documents(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
    ) -> anyhow::Result<u64>;

    async fn count_all_documents(&self) -> anyhow::Result<u64>;

    /// Run `pipeline` and return the raw result documents.
    async fn aggregate(
        &self,
        pipeline: Pipeline<FieldOf<T>>,
    ) -> anyhow::Result<Vec<serde_json::Value>>;

    /// Run a pipeline ending in a paginate stage.
    async fn paginate(&self, pipeline: Pipeline<FieldOf<T>>) -> anyhow::Result<PaginatedResponse<T>> {
        let results = self.aggregate(pipeline).await?;
        PaginatedResponse::from_facet(results)
    }
}
