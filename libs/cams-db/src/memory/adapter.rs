use std::marker::PhantomData;

use async_trait::async_trait;
use cams_errors::get_cams_error;
use cams_query::{ConditionOrConjunction, Pipeline, SortSpec};
use serde_json::Value as Json;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::aggregate::run_pipeline;
use super::matcher::{Matcher, sort_documents};
use super::store::InMemoryDatabase;
use crate::adapter::{
    CamsDocument, DocumentCollectionAdapter, DocumentPatch, FieldOf, ReplaceResult,
    UpdateResult,
};

fn count_of(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// [`DocumentCollectionAdapter`] over one collection of an [`InMemoryDatabase`].
pub struct InMemoryCollectionAdapter<T> {
    database: InMemoryDatabase,
    collection: String,
    module_name: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T: CamsDocument> InMemoryCollectionAdapter<T> {
    #[must_use]
    pub fn new(database: InMemoryDatabase, collection: &str, module_name: &'static str) -> Self {
        Self {
            database,
            collection: collection.to_owned(),
            module_name,
            _record: PhantomData,
        }
    }

    fn wrap(&self, err: impl Into<anyhow::Error>) -> anyhow::Error {
        get_cams_error(err.into(), self.module_name).into()
    }

    fn encode(&self, item: &T) -> anyhow::Result<serde_json::Map<String, Json>> {
        match serde_json::to_value(item).map_err(|e| self.wrap(e))? {
            Json::Object(mut map) => {
                map.remove("_id");
                Ok(map)
            }
            _ => Err(self.wrap(anyhow::anyhow!("document must serialize to an object"))),
        }
    }

    fn encode_new(&self, item: &T) -> anyhow::Result<(String, Json)> {
        let mut map = self.encode(item)?;
        let id = Uuid::new_v4().to_string();
        map.insert("id".to_owned(), Json::String(id.clone()));
        Ok((id, Json::Object(map)))
    }

    fn decode(&self, document: Json) -> anyhow::Result<T> {
        serde_json::from_value(document).map_err(|e| self.wrap(e))
    }

    /// Index of the first document matching `query`.
    fn position(
        &self,
        documents: &[Json],
        query: &ConditionOrConjunction<FieldOf<T>>,
    ) -> anyhow::Result<Option<usize>> {
        let matcher = Matcher::new(query).map_err(|e| self.wrap(e))?;
        for (i, document) in documents.iter().enumerate() {
            if matcher.is_match(document).map_err(|e| self.wrap(e))? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    fn filtered(
        &self,
        query: Option<&ConditionOrConjunction<FieldOf<T>>>,
    ) -> anyhow::Result<Vec<Json>> {
        let Some(query) = query else {
            return Ok(self.database.snapshot(&self.collection));
        };
        let matcher = Matcher::new(query).map_err(|e| self.wrap(e))?;
        let mut out = Vec::new();
        for document in self.database.snapshot(&self.collection) {
            if matcher.is_match(&document).map_err(|e| self.wrap(e))? {
                out.push(document);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl<T: CamsDocument> DocumentCollectionAdapter<T> for InMemoryCollectionAdapter<T> {
    #[instrument(name = "cams.memory.find", skip_all, fields(collection = %self.collection))]
    async fn find(
        &self,
        query: Option<ConditionOrConjunction<FieldOf<T>>>,
        sort: Option<SortSpec<FieldOf<T>>>,
    ) -> anyhow::Result<Vec<T>> {
        let mut documents = self.filtered(query.as_ref())?;
        if let Some(sort) = sort.as_ref() {
            sort_documents(&mut documents, sort);
        }
        debug!(count = documents.len(), "documents found");
        documents.into_iter().map(|d| self.decode(d)).collect()
    }

    async fn find_one(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
    ) -> anyhow::Result<Option<T>> {
        self.filtered(Some(&query))?
            .into_iter()
            .next()
            .map(|d| self.decode(d))
            .transpose()
    }

    #[instrument(name = "cams.memory.insert_one", skip_all, fields(collection = %self.collection))]
    async fn insert_one(&self, item: T) -> anyhow::Result<String> {
        let (id, document) = self.encode_new(&item)?;
        self.database
            .with_collection(&self.collection, |docs| docs.push(document));
        Ok(id)
    }

    async fn insert_many(&self, items: Vec<T>) -> anyhow::Result<Vec<String>> {
        let encoded = items
            .iter()
            .map(|item| self.encode_new(item))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let (ids, documents): (Vec<String>, Vec<Json>) = encoded.into_iter().unzip();
        self.database
            .with_collection(&self.collection, |docs| docs.extend(documents));
        Ok(ids)
    }

    async fn replace_one(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
        item: T,
        upsert: bool,
    ) -> anyhow::Result<ReplaceResult> {
        let mut map = self.encode(&item)?;
        let id = match map.get("id") {
            Some(Json::String(id)) => id.clone(),
            _ => {
                let id = Uuid::new_v4().to_string();
                map.insert("id".to_owned(), Json::String(id.clone()));
                id
            }
        };
        let replacement = Json::Object(map);
        self.database.with_collection(&self.collection, |docs| {
            let result = match self.position(docs, &query)? {
                Some(i) => {
                    let modified = u64::from(docs[i] != replacement);
                    docs[i] = replacement;
                    ReplaceResult {
                        id,
                        modified_count: modified,
                        upserted_count: 0,
                    }
                }
                None if upsert => {
                    docs.push(replacement);
                    ReplaceResult {
                        id,
                        modified_count: 0,
                        upserted_count: 1,
                    }
                }
                None => ReplaceResult {
                    id,
                    modified_count: 0,
                    upserted_count: 0,
                },
            };
            Ok(result)
        })
    }

    async fn update_one(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
        patch: DocumentPatch,
    ) -> anyhow::Result<UpdateResult> {
        self.database.with_collection(&self.collection, |docs| {
            let Some(i) = self.position(docs, &query)? else {
                return Ok(UpdateResult {
                    matched_count: 0,
                    modified_count: 0,
                });
            };
            let before = docs[i].clone();
            if let Json::Object(map) = &mut docs[i] {
                for (key, value) in patch {
                    if key != "_id" {
                        map.insert(key, value);
                    }
                }
            }
            Ok(UpdateResult {
                matched_count: 1,
                modified_count: u64::from(docs[i] != before),
            })
        })
    }

    async fn delete_one(&self, query: ConditionOrConjunction<FieldOf<T>>) -> anyhow::Result<u64> {
        self.database.with_collection(&self.collection, |docs| {
            Ok(match self.position(docs, &query)? {
                Some(i) => {
                    docs.remove(i);
                    1
                }
                None => 0,
            })
        })
    }

    async fn delete_many(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
    ) -> anyhow::Result<u64> {
        let matcher = Matcher::new(&query).map_err(|e| self.wrap(e))?;
        self.database.with_collection(&self.collection, |docs| {
            let hits = docs
                .iter()
                .map(|d| matcher.is_match(d))
                .collect::<anyhow::Result<Vec<bool>>>()
                .map_err(|e| self.wrap(e))?;
            let mut flags = hits.iter();
            docs.retain(|_| !flags.next().copied().unwrap_or(false));
            Ok(count_of(hits.into_iter().filter(|hit| *hit).count()))
        })
    }

    async fn count_documents(
        &self,
        query: ConditionOrConjunction<FieldOf<T>>,
    ) -> anyhow::Result<u64> {
        Ok(count_of(self.filtered(Some(&query))?.len()))
    }

    async fn count_all_documents(&self) -> anyhow::Result<u64> {
        Ok(count_of(self.database.snapshot(&self.collection).len()))
    }

    #[instrument(name = "cams.memory.aggregate", skip_all, fields(collection = %self.collection))]
    async fn aggregate(
        &self,
        pipeline: Pipeline<FieldOf<T>>,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let documents = self.database.snapshot(&self.collection);
        let source = |name: &str| self.database.snapshot(name);
        run_pipeline(documents, &pipeline, &source).map_err(|e| self.wrap(e))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn count_of_is_lossless_for_collection_sizes() {
        assert_eq!(count_of(0), 0);
        assert_eq!(count_of(3), 3);
        assert_eq!(count_of(usize::MAX), u64::try_from(usize::MAX).unwrap());
    }
}
