//! Recording test double for [`DocumentCollectionAdapter`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cams_db::{
    CamsDocument, Closeable, DocumentCollectionAdapter, DocumentPatch, FieldOf, ReplaceResult,
    UpdateResult,
};
use cams_errors::CamsError;
use cams_query::{ConditionOrConjunction, Pipeline, SortSpec};
use parking_lot::Mutex;

type Query<T> = ConditionOrConjunction<FieldOf<T>>;

pub enum Call<T: CamsDocument> {
    Find {
        query: Option<Query<T>>,
        sort: Option<SortSpec<FieldOf<T>>>,
    },
    FindOne(Query<T>),
    InsertOne(T),
    InsertMany(Vec<T>),
    ReplaceOne {
        query: Query<T>,
        item: T,
        upsert: bool,
    },
    UpdateOne {
        query: Query<T>,
        patch: DocumentPatch,
    },
    DeleteOne(Query<T>),
    DeleteMany(Query<T>),
    CountDocuments(Query<T>),
    CountAll,
    Aggregate(Pipeline<FieldOf<T>>),
}

#[derive(Clone)]
pub enum Failure {
    Foreign(String),
    Cams(CamsError),
}

/// Canned results returned by every call of the matching kind.
pub struct Responses<T> {
    pub find: Vec<T>,
    pub find_one: Option<T>,
    pub matched_count: u64,
    pub modified_count: u64,
    pub deleted_count: u64,
    pub count: u64,
    pub aggregate: Vec<serde_json::Value>,
    pub failure: Option<Failure>,
}

impl<T> Default for Responses<T> {
    fn default() -> Self {
        Self {
            find: Vec::new(),
            find_one: None,
            matched_count: 1,
            modified_count: 1,
            deleted_count: 1,
            count: 0,
            aggregate: Vec::new(),
            failure: None,
        }
    }
}

pub struct RecordingAdapter<T: CamsDocument> {
    calls: Mutex<Vec<Call<T>>>,
    responses: Mutex<Responses<T>>,
    next_id: AtomicUsize,
}

impl<T: CamsDocument + Clone> RecordingAdapter<T> {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::with_responses(Responses::default())
    }

    #[must_use]
    pub fn with_responses(responses: Responses<T>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(responses),
            next_id: AtomicUsize::new(1),
        })
    }

    #[must_use]
    pub fn failing(failure: Failure) -> Arc<Self> {
        Self::with_responses(Responses {
            failure: Some(failure),
            ..Responses::default()
        })
    }

    pub fn take_calls(&self) -> Vec<Call<T>> {
        std::mem::take(&mut *self.calls.lock())
    }

    fn record(&self, call: Call<T>) -> anyhow::Result<()> {
        self.calls.lock().push(call);
        match self.responses.lock().failure.clone() {
            None => Ok(()),
            Some(Failure::Foreign(message)) => Err(anyhow::anyhow!(message)),
            Some(Failure::Cams(err)) => Err(err.into()),
        }
    }

    fn next_id(&self) -> String {
        format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl<T: CamsDocument + Clone> DocumentCollectionAdapter<T> for RecordingAdapter<T> {
    async fn find(
        &self,
        query: Option<Query<T>>,
        sort: Option<SortSpec<FieldOf<T>>>,
    ) -> anyhow::Result<Vec<T>> {
        self.record(Call::Find { query, sort })?;
        Ok(self.responses.lock().find.clone())
    }

    async fn find_one(&self, query: Query<T>) -> anyhow::Result<Option<T>> {
        self.record(Call::FindOne(query))?;
        Ok(self.responses.lock().find_one.clone())
    }

    async fn insert_one(&self, item: T) -> anyhow::Result<String> {
        self.record(Call::InsertOne(item))?;
        Ok(self.next_id())
    }

    async fn insert_many(&self, items: Vec<T>) -> anyhow::Result<Vec<String>> {
        let n = items.len();
        self.record(Call::InsertMany(items))?;
        Ok((0..n).map(|_| self.next_id()).collect())
    }

    async fn replace_one(
        &self,
        query: Query<T>,
        item: T,
        upsert: bool,
    ) -> anyhow::Result<ReplaceResult> {
        self.record(Call::ReplaceOne {
            query,
            item,
            upsert,
        })?;
        Ok(ReplaceResult {
            id: self.next_id(),
            modified_count: self.responses.lock().modified_count,
            upserted_count: 0,
        })
    }

    async fn update_one(&self, query: Query<T>, patch: DocumentPatch) -> anyhow::Result<UpdateResult> {
        self.record(Call::UpdateOne { query, patch })?;
        let responses = self.responses.lock();
        Ok(UpdateResult {
            matched_count: responses.matched_count,
            modified_count: responses.modified_count,
        })
    }

    async fn delete_one(&self, query: Query<T>) -> anyhow::Result<u64> {
        self.record(Call::DeleteOne(query))?;
        Ok(self.responses.lock().deleted_count.min(1))
    }

    async fn delete_many(&self, query: Query<T>) -> anyhow::Result<u64> {
        self.record(Call::DeleteMany(query))?;
        Ok(self.responses.lock().deleted_count)
    }

    async fn count_documents(&self, query: Query<T>) -> anyhow::Result<u64> {
        self.record(Call::CountDocuments(query))?;
        Ok(self.responses.lock().count)
    }

    async fn count_all_documents(&self) -> anyhow::Result<u64> {
        self.record(Call::CountAll)?;
        Ok(self.responses.lock().count)
    }

    async fn aggregate(&self, pipeline: Pipeline<FieldOf<T>>) -> anyhow::Result<Vec<serde_json::Value>> {
        self.record(Call::Aggregate(pipeline))?;
        Ok(self.responses.lock().aggregate.clone())
    }
}

/// Connection double counting `close` calls.
#[derive(Clone, Default)]
pub struct CountingConnection {
    closed: Arc<AtomicUsize>,
}

impl CountingConnection {
    #[must_use]
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Closeable for CountingConnection {
    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}
