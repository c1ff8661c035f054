//! Repositories over the CAMS document collections.
//!
//! Each repository owns the [`cams_db::DocumentStore`] it was built from and closes it
//! when the repository itself is closed.

mod consolidations;
mod office_assignees;
mod orders;
mod trustee_notes;

#[cfg(test)]
mod recording;

#[cfg(test)]
mod trustee_notes_test;

pub use consolidations::ConsolidationOrdersMongoRepository;
pub use office_assignees::OfficeAssigneesMongoRepository;
pub use orders::OrdersMongoRepository;
pub use trustee_notes::TrusteeNotesMongoRepository;

/// Module names used to tag errors raised by each repository.
pub mod module_names {
    pub const ORDERS: &str = "ORDERS-MONGO-REPOSITORY";
    pub const CONSOLIDATION_ORDERS: &str = "COSMOS_DB_REPOSITORY_CONSOLIDATION_ORDERS";
    pub const TRUSTEE_NOTES: &str = "TRUSTEE-NOTES-MONGO-REPOSITORY";
    pub const OFFICE_ASSIGNEES: &str = "OFFICE-ASSIGNEES-MONGO-REPOSITORY";
}

/// Collection names.
pub mod collections {
    pub const ORDERS: &str = "orders";
    pub const CONSOLIDATIONS: &str = "consolidations";
    pub const TRUSTEES: &str = "trustees";
    pub const OFFICE_ASSIGNEES: &str = "office-assignees";
}
