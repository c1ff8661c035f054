use std::sync::Arc;

use async_trait::async_trait;
use cams_db::{Closeable, DocumentCollectionAdapter, DocumentStore, merge_mutable};
use cams_errors::{CamsError, get_cams_error, get_cams_error_with_stack};
use cams_query::{SortDirection, all_of, order_by, using};
use cams_sdk::{
    OrderStatus, OrdersSearchPredicate, TransferOrder, TransferOrderAction, TransferOrderField,
};
use tracing::{debug, instrument};

use super::collections;
use super::module_names::ORDERS as MODULE_NAME;
use crate::domain::repo::OrdersRepository;

/// Attributes identifying an order; a reviewer's action never overwrites them.
const IMMUTABLE_FIELDS: &[&str] = &["id", "orderType", "caseId"];

fn wrap(err: anyhow::Error) -> CamsError {
    get_cams_error(err, MODULE_NAME)
}

/// Transfer orders in the `orders` collection.
pub struct OrdersMongoRepository {
    adapter: Arc<dyn DocumentCollectionAdapter<TransferOrder>>,
    connection: Box<dyn Closeable>,
}

impl OrdersMongoRepository {
    #[must_use]
    pub fn new<S: DocumentStore>(store: S) -> Self {
        let adapter = store.adapter(MODULE_NAME, collections::ORDERS);
        Self::with_adapter(adapter, Box::new(store))
    }

    #[must_use]
    pub fn with_adapter(
        adapter: Arc<dyn DocumentCollectionAdapter<TransferOrder>>,
        connection: Box<dyn Closeable>,
    ) -> Self {
        Self {
            adapter,
            connection,
        }
    }
}

#[async_trait]
impl Closeable for OrdersMongoRepository {
    async fn close(&self) {
        self.connection.close().await;
    }
}

#[async_trait]
impl OrdersRepository for OrdersMongoRepository {
    #[instrument(name = "cams.orders.search", skip_all, fields(db.system = "mongodb", db.operation = "find"))]
    async fn search(
        &self,
        predicate: Option<&OrdersSearchPredicate>,
    ) -> Result<Vec<TransferOrder>, CamsError> {
        let doc = using::<TransferOrderField>();
        let query = predicate.and_then(|p| {
            all_of::<TransferOrderField, _>(
                p.division_codes
                    .as_ref()
                    .map(|codes| doc(TransferOrderField::CourtDivisionCode).contains(codes)),
            )
        });
        let sort = order_by([(TransferOrderField::OrderDate, SortDirection::Ascending)]);
        self.adapter.find(query, Some(sort)).await.map_err(wrap)
    }

    #[instrument(name = "cams.orders.read", skip_all, fields(db.system = "mongodb", db.operation = "findOne", order_id = %id))]
    async fn read(&self, id: &str) -> Result<Option<TransferOrder>, CamsError> {
        let doc = using::<TransferOrderField>();
        self.adapter
            .find_one(doc(TransferOrderField::Id).equals(id).into())
            .await
            .map_err(wrap)
    }

    #[instrument(name = "cams.orders.create_many", skip_all, fields(db.system = "mongodb", db.operation = "insertMany"))]
    async fn create_many(
        &self,
        orders: Option<Vec<TransferOrder>>,
    ) -> Result<Vec<TransferOrder>, CamsError> {
        let Some(orders) = orders.filter(|o| !o.is_empty()) else {
            debug!("no orders to create");
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
            .map(|(order, id)| TransferOrder {
                id: Some(id),
                ..order
            })
            .collect())
    }

    #[instrument(name = "cams.orders.update", skip_all, fields(db.system = "mongodb", db.operation = "replaceOne", order_id = %action.id))]
    async fn update(&self, action: TransferOrderAction) -> Result<TransferOrder, CamsError> {
        let doc = using::<TransferOrderField>();
        let by_id = doc(TransferOrderField::Id).equals(&action.id);

        let existing = self
            .adapter
            .find_one(by_id.clone().into())
            .await
            .map_err(wrap)?
            .ok_or_else(|| {
                CamsError::not_found(MODULE_NAME, format!("Order not found with id {}.", action.id))
            })?;

        if action.status != OrderStatus::Approved {
            debug!(status = ?action.status, "order not approved, nothing written");
            return Ok(existing);
        }

        let merged = merge_mutable(&existing, &action, IMMUTABLE_FIELDS).map_err(wrap)?;
        self.adapter
            .replace_one(by_id.into(), merged.clone(), false)
            .await
            .map_err(|e| {
                get_cams_error_with_stack(
                    e,
                    MODULE_NAME,
                    &format!("Unable to update order {}.", action.id),
                )
            })?;
        Ok(merged)
    }
}
