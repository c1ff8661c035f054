//! Public models for the CAMS persistence module.
//!
//! Records serialize to the camelCase documents stored in the `orders`,
//! `consolidations`, `trustees` and `office-assignees` collections. Each stored record
//! has a field enum used to build typed queries with `cams_query`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod audit;
pub mod consolidations;
pub mod office_assignees;
pub mod orders;
pub mod trustee_notes;
pub mod user;

pub use audit::{Auditable, create_audit_record};
pub use consolidations::{
    ConsolidationOrder, ConsolidationOrderCase, ConsolidationOrderField,
    ConsolidationOrderUpdate, ConsolidationType, OrdersSearchPredicate,
};
pub use office_assignees::{OfficeAssignee, OfficeAssigneeField, OfficeAssigneePredicate};
pub use orders::{
    CaseSummary, OrderStatus, OrderType, TransferOrder, TransferOrderAction, TransferOrderField,
};
pub use trustee_notes::{
    TRUSTEE_NOTE_DOCUMENT_TYPE, TrusteeNote, TrusteeNoteArchival, TrusteeNoteField,
    TrusteeNoteInput, TrusteeNoteUpdate,
};
pub use user::CamsUserReference;
