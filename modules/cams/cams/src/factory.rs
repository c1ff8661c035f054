//! Composition root for CAMS repositories.
//!
//! The factory owns one [`SharedInstance`] slot per repository. Callers take a
//! [`Lease`] and release it when finished; the repository and its store connection are
//! closed when the last lease is released.

use cams_db::mongo::MongoConnector;
use cams_db::{DocumentConnector, DocumentDbConfig, Lease, SharedInstance};
use cams_errors::{CamsError, get_cams_error};

use crate::infra::storage::mongo::{
    ConsolidationOrdersMongoRepository, OfficeAssigneesMongoRepository, OrdersMongoRepository,
    TrusteeNotesMongoRepository,
};

const MODULE_NAME: &str = "REPOSITORY-FACTORY";

pub struct RepositoryFactory<C: DocumentConnector> {
    connector: C,
    orders: SharedInstance<OrdersMongoRepository>,
    consolidations: SharedInstance<ConsolidationOrdersMongoRepository>,
    trustee_notes: SharedInstance<TrusteeNotesMongoRepository>,
    office_assignees: SharedInstance<OfficeAssigneesMongoRepository>,
}

impl RepositoryFactory<MongoConnector> {
    /// Factory over a MongoDB deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed.
    pub async fn from_config(config: &DocumentDbConfig) -> Result<Self, CamsError> {
        let connector = MongoConnector::from_config(config)
            .await
            .map_err(|e| get_cams_error(e, MODULE_NAME))?;
        Ok(Self::new(connector))
    }
}

impl<C: DocumentConnector> RepositoryFactory<C> {
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            orders: SharedInstance::new("orders-repository"),
            consolidations: SharedInstance::new("consolidation-orders-repository"),
            trustee_notes: SharedInstance::new("trustee-notes-repository"),
            office_assignees: SharedInstance::new("office-assignees-repository"),
        }
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn connect(&self) -> Result<C::Store, CamsError> {
        self.connector
            .connect()
            .map_err(|e| get_cams_error(e, MODULE_NAME))
    }

    /// # Errors
    ///
    /// Returns an error if a new store connection cannot be opened.
    pub fn orders_repository(&self) -> Result<Lease<'_, OrdersMongoRepository>, CamsError> {
        self.orders
            .lease(|| self.connect().map(OrdersMongoRepository::new))
    }

    /// # Errors
    ///
    /// Returns an error if a new store connection cannot be opened.
    pub fn consolidation_orders_repository(
        &self,
    ) -> Result<Lease<'_, ConsolidationOrdersMongoRepository>, CamsError> {
        self.consolidations
            .lease(|| self.connect().map(ConsolidationOrdersMongoRepository::new))
    }

    /// # Errors
    ///
    /// Returns an error if a new store connection cannot be opened.
    pub fn trustee_notes_repository(
        &self,
    ) -> Result<Lease<'_, TrusteeNotesMongoRepository>, CamsError> {
        self.trustee_notes
            .lease(|| self.connect().map(TrusteeNotesMongoRepository::new))
    }

    /// # Errors
    ///
    /// Returns an error if a new store connection cannot be opened.
    pub fn office_assignees_repository(
        &self,
    ) -> Result<Lease<'_, OfficeAssigneesMongoRepository>, CamsError> {
        self.office_assignees
            .lease(|| self.connect().map(OfficeAssigneesMongoRepository::new))
    }

    /// Outstanding leases per repository: orders, consolidations, trustee notes, office
    /// assignees.
    #[must_use]
    pub fn reference_counts(&self) -> [usize; 4] {
        [
            self.orders.reference_count(),
            self.consolidations.reference_count(),
            self.trustee_notes.reference_count(),
            self.office_assignees.reference_count(),
        ]
    }
}
