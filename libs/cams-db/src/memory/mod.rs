//! In-memory document store evaluating `cams_query` trees over JSON documents.
//!
//! Intended for tests and local development. Query semantics follow MongoDB for the
//! supported operators: a missing field equals `null`, array fields match if any
//! element matches, and missing values sort first.

mod adapter;
mod aggregate;
mod matcher;
mod store;

pub use adapter::InMemoryCollectionAdapter;
pub use matcher::{Matcher, matches};
pub use store::{InMemoryConnector, InMemoryDatabase, InMemoryDocumentStore};
