use std::sync::Arc;

use async_trait::async_trait;
use cams_db::{Closeable, DocumentCollectionAdapter, DocumentStore};
use cams_errors::{CamsError, get_cams_error};
use cams_query::{
    ConditionOrConjunction, all_of, ascending, first, group, match_stage, pipeline, sort, using,
};
use cams_sdk::{CamsUserReference, OfficeAssignee, OfficeAssigneeField, OfficeAssigneePredicate};
use serde::Deserialize;
use tracing::instrument;

use super::collections;
use super::module_names::OFFICE_ASSIGNEES as MODULE_NAME;
use crate::domain::repo::OfficeAssigneesRepository;

fn wrap(err: anyhow::Error) -> CamsError {
    get_cams_error(err, MODULE_NAME)
}

fn to_query(predicate: &OfficeAssigneePredicate) -> Option<ConditionOrConjunction<OfficeAssigneeField>> {
    let doc = using::<OfficeAssigneeField>();
    all_of::<OfficeAssigneeField, _>(
        [
            (OfficeAssigneeField::OfficeCode, &predicate.office_code),
            (OfficeAssigneeField::CaseId, &predicate.case_id),
            (OfficeAssigneeField::UserId, &predicate.user_id),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| doc(field).equals(v))),
    )
}

/// One row of the distinct-assignee aggregation: `{ _id: userId, name }`.
#[derive(Deserialize)]
struct DistinctAssignee {
    #[serde(rename = "_id")]
    user_id: String,
    name: String,
}

impl From<DistinctAssignee> for CamsUserReference {
    fn from(row: DistinctAssignee) -> Self {
        Self::new(row.user_id, row.name)
    }
}

/// Staff-to-case assignments in the `office-assignees` collection.
pub struct OfficeAssigneesMongoRepository {
    adapter: Arc<dyn DocumentCollectionAdapter<OfficeAssignee>>,
    connection: Box<dyn Closeable>,
}

impl OfficeAssigneesMongoRepository {
    #[must_use]
    pub fn new<S: DocumentStore>(store: S) -> Self {
        let adapter = store.adapter(MODULE_NAME, collections::OFFICE_ASSIGNEES);
        Self::with_adapter(adapter, Box::new(store))
    }

    #[must_use]
    pub fn with_adapter(
        adapter: Arc<dyn DocumentCollectionAdapter<OfficeAssignee>>,
        connection: Box<dyn Closeable>,
    ) -> Self {
        Self {
            adapter,
            connection,
        }
    }
}

#[async_trait]
impl Closeable for OfficeAssigneesMongoRepository {
    async fn close(&self) {
        self.connection.close().await;
    }
}

#[async_trait]
impl OfficeAssigneesRepository for OfficeAssigneesMongoRepository {
    #[instrument(name = "cams.office_assignees.create", skip_all, fields(db.system = "mongodb", db.operation = "insertOne", case_id = %assignee.case_id))]
    async fn create(&self, assignee: OfficeAssignee) -> Result<OfficeAssignee, CamsError> {
        let id = self
            .adapter
            .insert_one(assignee.clone())
            .await
            .map_err(wrap)?;
        Ok(OfficeAssignee {
            id: Some(id),
            ..assignee
        })
    }

    #[instrument(name = "cams.office_assignees.search", skip_all, fields(db.system = "mongodb", db.operation = "find"))]
    async fn search(
        &self,
        predicate: Option<&OfficeAssigneePredicate>,
    ) -> Result<Vec<OfficeAssignee>, CamsError> {
        self.adapter
            .find(predicate.and_then(to_query), None)
            .await
            .map_err(wrap)
    }

    #[instrument(name = "cams.office_assignees.delete_many", skip_all, fields(db.system = "mongodb", db.operation = "deleteMany"))]
    async fn delete_many(&self, predicate: &OfficeAssigneePredicate) -> Result<u64, CamsError> {
        let Some(query) = to_query(predicate) else {
            return Err(CamsError::bad_request(
                MODULE_NAME,
                "Refusing to delete office assignees without a predicate.",
            ));
        };
        self.adapter.delete_many(query).await.map_err(wrap)
    }

    #[instrument(name = "cams.office_assignees.distinct_by_office", skip_all, fields(db.system = "mongodb", db.operation = "aggregate", office_code = %office_code))]
    async fn get_distinct_assignees_by_office(
        &self,
        office_code: &str,
    ) -> Result<Vec<CamsUserReference>, CamsError> {
        let doc = using::<OfficeAssigneeField>();
        let query = pipeline([
            match_stage(doc(OfficeAssigneeField::OfficeCode).equals(office_code)),
            group(
                [OfficeAssigneeField::UserId],
                [first(OfficeAssigneeField::Name, "name")],
            ),
            sort([ascending(OfficeAssigneeField::Name)]),
        ]);
        let rows = self.adapter.aggregate(query).await.map_err(wrap)?;
        rows.into_iter()
            .map(|row| serde_json::from_value::<DistinctAssignee>(row).map(Into::into))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| wrap(e.into()))
    }
}
