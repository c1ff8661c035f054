//! MongoDB backend: renderers from the `cams_query` tree to native documents, and the
//! collection adapter built on them.

mod adapter;
mod aggregate;
mod query;
mod store;

pub use adapter::MongoCollectionAdapter;
pub use aggregate::to_mongo_aggregate;
pub use query::{to_bson, to_mongo_query, to_mongo_sort};
pub use store::{MongoConnector, MongoDocumentStore};
