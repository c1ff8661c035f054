use std::marker::PhantomData;

use async_trait::async_trait;
use cams_errors::get_cams_error;
use cams_query::{ConditionOrConjunction, Pipeline, SortSpec};
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{self, Bson, Document, doc};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::aggregate::to_mongo_aggregate;
use super::query::{to_mongo_query, to_mongo_sort};
use crate::adapter::{
    CamsDocument, DocumentCollectionAdapter, DocumentPatch, FieldOf, ReplaceResult,
    UpdateResult,
};

/// [`DocumentCollectionAdapter`] over a MongoDB collection.
///
/// Documents are stored with a string `id` generated here; the server-assigned `_id`
/// is never exposed.
pub struct MongoCollectionAdapter<T> {
    collection: Collection<Document>,
    module_name: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T: CamsDocument> MongoCollectionAdapter<T> {
    #[must_use]
    pub fn new(collection: Collection<Document>, module_name: &'static str) -> Self {
        Self {
            collection,
            module_name,
            _record: PhantomData,
        }
    }

    fn wrap(&self, err: impl Into<anyhow::Error>) -> anyhow::Error {
        get_cams_error(err.into(), self.module_name).into()
    }

    fn decode(&self, document: Document) -> anyhow::Result<T> {
        bson::from_document(document).map_err(|e| self.wrap(e))
    }

    /// Serialize `item` for insertion under a fresh id.
    fn encode_new(&self, item: &T) -> anyhow::Result<(String, Document)> {
        let mut document = bson::to_document(item).map_err(|e| self.wrap(e))?;
        document.remove("_id");
        let id = Uuid::new_v4().to_string();
        document.insert("id", id.clone());
        Ok((id, document))
    }
}

#[async_trait]
impl<T: CamsDocument> DocumentCollectionAdapter<T> for MongoCollectionAdapter<T> {
    #[instrument(name = "cams.mongo.find", skip_all, fields(db.system = "mongodb", db.operation = "find"))]
    async fn find(
        &self,
        query: Option<ConditionOrConjunction<FieldOf<T>>>,
        sort: Option<SortSpec<FieldOf<T>>>,
    ) -> anyhow::Result<Vec<T>> {
        let filter = query.as_ref().map(to_mongo_query).unwrap_or_default();
        let mut action = self.collection.find(filter);
        if let Some(sort) = sort.as_ref() {
            action = action.sort(to_mongo_sort(sort));
        }
        let documents: Vec<Document> = action
            .await
            .map_err(|e| self.wrap(e))?
            .try_collect()
            .await
            .map_err(|e| self.wrap(e))?;
        debug!(count = documents.len(), "documents found");
        documents.into_iter().map(|d| self.decode(d)).collect()
    }

    #[instrument(name = "cams.mongo.find_one", skip_all, fields(db.system = "mongodb", db.operation = "findOne"))]
    async fn find_one(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
    ) -> anyhow::Result<Option<T>> {
        let found = self
            .collection
            .find_one(to_mongo_query(&query))
            .await
            .map_err(|e| self.wrap(e))?;
        found.map(|d| self.decode(d)).transpose()
    }

    #[instrument(name = "cams.mongo.insert_one", skip_all, fields(db.system = "mongodb", db.operation = "insertOne"))]
    async fn insert_one(&self, item: T) -> anyhow::Result<String> {
        let (id, document) = self.encode_new(&item)?;
        self.collection
            .insert_one(document)
            .await
            .map_err(|e| self.wrap(e))?;
        debug!(%id, "document inserted");
        Ok(id)
    }

    #[instrument(name = "cams.mongo.insert_many", skip_all, fields(db.system = "mongodb", db.operation = "insertMany", count = items.len()))]
    async fn insert_many(&self, items: Vec<T>) -> anyhow::Result<Vec<String>> {
        let mut ids = Vec::with_capacity(items.len());
        let mut documents = Vec::with_capacity(items.len());
        for item in &items {
            let (id, document) = self.encode_new(item)?;
            ids.push(id);
            documents.push(document);
        }
        let result = self
            .collection
            .insert_many(documents)
            .await
            .map_err(|e| self.wrap(e))?;
        if result.inserted_ids.len() != ids.len() {
            return Err(self.wrap(anyhow::anyhow!(
                "Not all items inserted: {} of {}",
                result.inserted_ids.len(),
                ids.len()
            )));
        }
        Ok(ids)
    }

    #[instrument(name = "cams.mongo.replace_one", skip_all, fields(db.system = "mongodb", db.operation = "replaceOne", upsert = upsert))]
    async fn replace_one(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
        item: T,
        upsert: bool,
    ) -> anyhow::Result<ReplaceResult> {
        let mut document = bson::to_document(&item).map_err(|e| self.wrap(e))?;
        document.remove("_id");
        let id = match document.get("id") {
            Some(Bson::String(id)) => id.clone(),
            _ => {
                let id = Uuid::new_v4().to_string();
                document.insert("id", id.clone());
                id
            }
        };
        let result = self
            .collection
            .replace_one(to_mongo_query(&query), document)
            .upsert(upsert)
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(ReplaceResult {
            id,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
        })
    }

    #[instrument(name = "cams.mongo.update_one", skip_all, fields(db.system = "mongodb", db.operation = "updateOne"))]
    async fn update_one(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
        patch: DocumentPatch,
    ) -> anyhow::Result<UpdateResult> {
        let mut set = bson::to_document(&patch).map_err(|e| self.wrap(e))?;
        set.remove("_id");
        let result = self
            .collection
            .update_one(to_mongo_query(&query), doc! { "$set": set })
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(UpdateResult {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    #[instrument(name = "cams.mongo.delete_one", skip_all, fields(db.system = "mongodb", db.operation = "deleteOne"))]
    async fn delete_one(&self, query: ConditionOrConjunction<FieldOf<T>>) -> anyhow::Result<u64> {
        let result = self
            .collection
            .delete_one(to_mongo_query(&query))
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(result.deleted_count)
    }

    #[instrument(name = "cams.mongo.delete_many", skip_all, fields(db.system = "mongodb", db.operation = "deleteMany"))]
    async fn delete_many(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
    ) -> anyhow::Result<u64> {
        let result = self
            .collection
            .delete_many(to_mongo_query(&query))
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(result.deleted_count)
    }

    #[instrument(name = "cams.mongo.count_documents", skip_all, fields(db.system = "mongodb", db.operation = "countDocuments"))]
    async fn count_documents(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
    ) -> anyhow::Result<u64> {
        self.collection
            .count_documents(to_mongo_query(&query))
            .await
            .map_err(|e| self.wrap(e))
    }

    #[instrument(name = "cams.mongo.count_all_documents", skip_all, fields(db.system = "mongodb", db.operation = "countDocuments"))]
    async fn count_all_documents(&self) -> anyhow::Result<u64> {
        self.collection
            .count_documents(Document::new())
            .await
            .map_err(|e| self.wrap(e))
    }

    #[instrument(name = "cams.mongo.aggregate", skip_all, fields(db.system = "mongodb", db.operation = "aggregate"))]
    async fn aggregate(
        &self,
        pipeline: Pipeline<FieldOf<T>>,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let stages = to_mongo_aggregate(&pipeline);
        let documents: Vec<Document> = self
            .collection
            .aggregate(stages)
            .await
            .map_err(|e| self.wrap(e))?
            .try_collect()
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(documents
            .into_iter()
            .map(|d| Bson::Document(d).into_relaxed_extjson())
            .collect())
    }
}
