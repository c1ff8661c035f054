use async_trait::async_trait;
use cams_errors::CamsError;
use cams_sdk::{
    CamsUserReference, ConsolidationOrder, ConsolidationOrderUpdate, OfficeAssignee,
    OfficeAssigneePredicate, OrdersSearchPredicate, TransferOrder, TransferOrderAction,
    TrusteeNote, TrusteeNoteArchival, TrusteeNoteUpdate,
};

/// Result of a read-merge-write update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome<T> {
    Updated(T),
    /// The record was found but the store reported no modified document.
    NotModified,
}

#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Transfer orders in the given divisions, oldest first.
    async fn search(
        &self,
        predicate: Option<&OrdersSearchPredicate>,
    ) -> Result<Vec<TransferOrder>, CamsError>;

    async fn read(&self, id: &str) -> Result<Option<TransferOrder>, CamsError>;

    /// Store `orders` and return them with their assigned ids. `None` or an empty list
    /// stores nothing.
    async fn create_many(
        &self,
        orders: Option<Vec<TransferOrder>>,
    ) -> Result<Vec<TransferOrder>, CamsError>;

    /// Apply a reviewer's action. Only approvals are written.
    async fn update(&self, action: TransferOrderAction) -> Result<TransferOrder, CamsError>;
}

#[async_trait]
pub trait ConsolidationOrdersRepository: Send + Sync {
    async fn search(
        &self,
        predicate: Option<&OrdersSearchPredicate>,
    ) -> Result<Vec<ConsolidationOrder>, CamsError>;

    async fn read(&self, consolidation_id: &str) -> Result<Option<ConsolidationOrder>, CamsError>;

    async fn create(&self, order: ConsolidationOrder) -> Result<ConsolidationOrder, CamsError>;

    async fn create_many(
        &self,
        orders: Option<Vec<ConsolidationOrder>>,
    ) -> Result<Vec<ConsolidationOrder>, CamsError>;

    async fn update(
        &self,
        update: ConsolidationOrderUpdate,
    ) -> Result<UpdateOutcome<ConsolidationOrder>, CamsError>;

    async fn delete(&self, consolidation_id: &str) -> Result<(), CamsError>;

    /// Number of consolidations whose id starts with `key_root`.
    async fn count(&self, key_root: &str) -> Result<u64, CamsError>;
}

#[async_trait]
pub trait TrusteeNotesRepository: Send + Sync {
    async fn create(&self, note: TrusteeNote) -> Result<TrusteeNote, CamsError>;

    async fn read(&self, id: &str) -> Result<Option<TrusteeNote>, CamsError>;

    async fn update(&self, update: TrusteeNoteUpdate) -> Result<(), CamsError>;

    async fn archive_trustee_note(&self, archival: TrusteeNoteArchival) -> Result<(), CamsError>;

    /// Unarchived notes of a trustee, most recently updated first.
    async fn get_notes_by_trustee_id(&self, trustee_id: &str)
    -> Result<Vec<TrusteeNote>, CamsError>;
}

#[async_trait]
pub trait OfficeAssigneesRepository: Send + Sync {
    async fn create(&self, assignee: OfficeAssignee) -> Result<OfficeAssignee, CamsError>;

    async fn search(
        &self,
        predicate: Option<&OfficeAssigneePredicate>,
    ) -> Result<Vec<OfficeAssignee>, CamsError>;

    /// Remove every assignment matching `predicate`, which must constrain at least one
    /// attribute.
    async fn delete_many(&self, predicate: &OfficeAssigneePredicate) -> Result<u64, CamsError>;

    async fn get_distinct_assignees_by_office(
        &self,
        office_code: &str,
    ) -> Result<Vec<CamsUserReference>, CamsError>;
}
