//! Document collection adapters for CAMS repositories.
//!
//! Repositories talk to storage only through [`DocumentCollectionAdapter`]. Two
//! implementations are provided:
//! - [`mongo::MongoCollectionAdapter`] renders the `cams_query` tree into native MongoDB
//!   filters, sorts and aggregation pipelines;
//! - [`memory::InMemoryCollectionAdapter`] evaluates the same tree over JSON documents.
//!
//! [`SharedInstance`] provides reference-counted, lazily constructed instances with a
//! single `close` when the last holder releases.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapter;
pub mod config;
pub mod instance;
pub mod memory;
pub mod merge;
pub mod mongo;
pub mod store;

pub use adapter::{
    CamsDocument, DocumentCollectionAdapter, DocumentPatch, FieldOf, PaginatedResponse,
    PaginationMetadata, ReplaceResult, UpdateResult,
};
pub use config::DocumentDbConfig;
pub use instance::{Lease, SharedInstance};
pub use merge::{merge_mutable, patch_from};
pub use store::{Closeable, DocumentConnector, DocumentStore};
