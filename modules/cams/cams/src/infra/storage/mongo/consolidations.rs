use std::sync::Arc;

use async_trait::async_trait;
use cams_db::{Closeable, DocumentCollectionAdapter, DocumentStore, merge_mutable};
use cams_errors::{CamsError, get_cams_error, get_cams_error_with_stack};
use cams_query::{ConditionOrConjunction, SortDirection, all_of, order_by, using};
use cams_sdk::{
    ConsolidationOrder, ConsolidationOrderField, ConsolidationOrderUpdate, OrdersSearchPredicate,
};
use tracing::{debug, instrument, warn};

use super::collections;
use super::module_names::CONSOLIDATION_ORDERS as MODULE_NAME;
use crate::domain::repo::{ConsolidationOrdersRepository, UpdateOutcome};

const IMMUTABLE_FIELDS: &[&str] = &["id", "consolidationId", "jobId"];

fn wrap(err: anyhow::Error) -> CamsError {
    get_cams_error(err, MODULE_NAME)
}

fn by_consolidation_id(consolidation_id: &str) -> ConditionOrConjunction<ConsolidationOrderField> {
    let doc = using::<ConsolidationOrderField>();
    doc(ConsolidationOrderField::ConsolidationId)
        .equals(consolidation_id)
        .into()
}

/// Consolidation orders in the `consolidations` collection, keyed by consolidation id.
pub struct ConsolidationOrdersMongoRepository {
    adapter: Arc<dyn DocumentCollectionAdapter<ConsolidationOrder>>,
    connection: Box<dyn Closeable>,
}

impl ConsolidationOrdersMongoRepository {
    #[must_use]
    pub fn new<S: DocumentStore>(store: S) -> Self {
        let adapter = store.adapter(MODULE_NAME, collections::CONSOLIDATIONS);
        Self::with_adapter(adapter, Box::new(store))
    }

    #[must_use]
    pub fn with_adapter(
        adapter: Arc<dyn DocumentCollectionAdapter<ConsolidationOrder>>,
        connection: Box<dyn Closeable>,
    ) -> Self {
        Self {
            adapter,
            connection,
        }
    }
}

#[async_trait]
impl Closeable for ConsolidationOrdersMongoRepository {
    async fn close(&self) {
        self.connection.close().await;
    }
}

#[async_trait]
impl ConsolidationOrdersRepository for ConsolidationOrdersMongoRepository {
    #[instrument(name = "cams.consolidations.search", skip_all, fields(db.system = "mongodb", db.operation = "find"))]
    async fn search(
        &self,
        predicate: Option<&OrdersSearchPredicate>,
    ) -> Result<Vec<ConsolidationOrder>, CamsError> {
        let doc = using::<ConsolidationOrderField>();
        let query = predicate.and_then(|p| {
            let division = p
                .division_codes
                .as_ref()
                .map(|codes| doc(ConsolidationOrderField::CourtDivisionCode).contains(codes));
            let consolidation = p
                .consolidation_id
                .as_ref()
                .map(|id| doc(ConsolidationOrderField::ConsolidationId).equals(id));
            all_of::<ConsolidationOrderField, _>(division.into_iter().chain(consolidation))
        });
        let sort = order_by([(ConsolidationOrderField::OrderDate, SortDirection::Ascending)]);
        self.adapter.find(query, Some(sort)).await.map_err(wrap)
    }

    #[instrument(name = "cams.consolidations.read", skip_all, fields(db.system = "mongodb", db.operation = "findOne", consolidation_id = %consolidation_id))]
    async fn read(&self, consolidation_id: &str) -> Result<Option<ConsolidationOrder>, CamsError> {
        self.adapter
            .find_one(by_consolidation_id(consolidation_id))
            .await
            .map_err(wrap)
    }

    #[instrument(name = "cams.consolidations.create", skip_all, fields(db.system = "mongodb", db.operation = "insertOne", consolidation_id = %order.consolidation_id))]
    async fn create(&self, order: ConsolidationOrder) -> Result<ConsolidationOrder, CamsError> {
        let id = self
            .adapter
            .insert_one(order.clone())
            .await
            .map_err(wrap)?;
        Ok(ConsolidationOrder {
            id: Some(id),
            ..order
        })
    }

    #[instrument(name = "cams.consolidations.create_many", skip_all, fields(db.system = "mongodb", db.operation = "insertMany"))]
    async fn create_many(
        &self,
        orders: Option<Vec<ConsolidationOrder>>,
    ) -> Result<Vec<ConsolidationOrder>, CamsError> {
        let Some(orders) = orders.filter(|o| !o.is_empty()) else {
            debug!("no consolidation orders to create");
            return Ok(Vec::new());
        };
        let ids = self
            .adapter
            .insert_many(orders.clone())
            .await
            .map_err(wrap)?;
        Ok(orders
            .into_iter()
            .zip(ids)
            .map(|(order, id)| ConsolidationOrder {
                id: Some(id),
                ..order
            })
            .collect())
    }

    #[instrument(name = "cams.consolidations.update", skip_all, fields(db.system = "mongodb", db.operation = "replaceOne", consolidation_id = %update.consolidation_id))]
    async fn update(
        &self,
        update: ConsolidationOrderUpdate,
    ) -> Result<UpdateOutcome<ConsolidationOrder>, CamsError> {
        let query = by_consolidation_id(&update.consolidation_id);
        let stack_message = format!(
            "Unable to update consolidation order {}.",
            update.consolidation_id
        );

        let existing = self
            .adapter
            .find_one(query.clone())
            .await
            .map_err(|e| get_cams_error_with_stack(e, MODULE_NAME, &stack_message))?
            .ok_or_else(|| {
                CamsError::not_found(
                    MODULE_NAME,
                    format!(
                        "Consolidation order not found with id {}.",
                        update.consolidation_id
                    ),
                )
            })?;

        let merged = merge_mutable(&existing, &update, IMMUTABLE_FIELDS).map_err(wrap)?;
        let result = self
            .adapter
            .replace_one(query, merged.clone(), false)
            .await
            .map_err(|e| get_cams_error_with_stack(e, MODULE_NAME, &stack_message))?;

        if result.modified_count == 1 {
            Ok(UpdateOutcome::Updated(merged))
        } else {
            warn!(
                modified_count = result.modified_count,
                "consolidation order update modified nothing"
            );
            Ok(UpdateOutcome::NotModified)
        }
    }

    #[instrument(name = "cams.consolidations.delete", skip_all, fields(db.system = "mongodb", db.operation = "deleteOne", consolidation_id = %consolidation_id))]
    async fn delete(&self, consolidation_id: &str) -> Result<(), CamsError> {
        let deleted = self
            .adapter
            .delete_one(by_consolidation_id(consolidation_id))
            .await
            .map_err(wrap)?;
        if deleted == 0 {
            debug!("no consolidation order to delete");
        }
        Ok(())
    }

    #[instrument(name = "cams.consolidations.count", skip_all, fields(db.system = "mongodb", db.operation = "countDocuments", key_root = %key_root))]
    async fn count(&self, key_root: &str) -> Result<u64, CamsError> {
        let doc = using::<ConsolidationOrderField>();
        let pattern = format!("^{}", regex::escape(key_root));
        self.adapter
            .count_documents(doc(ConsolidationOrderField::ConsolidationId).regex(pattern).into())
            .await
            .map_err(wrap)
    }
}
