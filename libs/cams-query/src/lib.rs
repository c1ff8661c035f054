//! Typed query language for CAMS document collections.
//!
//! Predicates are built as an immutable tree of [`Condition`] and [`Conjunction`] nodes
//! over a per-record field enum (see [`DocumentField`]). The tree is storage-agnostic;
//! adapters render it into a native filter at the persistence boundary.
//!
//! ```rust,ignore
//! use cams_query::{and, order_by, using, SortDirection};
//!
//! let doc = using::<OrderField>();
//! let query = and([
//!     doc(OrderField::CourtDivisionCode).contains(["081", "087"]),
//!     doc(OrderField::Status).equals("pending"),
//! ])?;
//! let sort = order_by([(OrderField::OrderDate, SortDirection::Ascending)]);
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod builder;
pub mod condition;
pub mod field;
pub mod pipeline;
pub mod value;

pub use builder::{
    FieldQuery, SortDirection, SortField, SortSpec, all_of, and, not, or, order_by, using,
};
pub use condition::{
    Condition, ConditionKind, ConditionOrConjunction, Conjunction, ConjunctionKind, Operand,
    QueryError,
};
pub use field::{DocumentField, Field, Schema};
pub use pipeline::{
    Accumulator, AdditionalField, Group, Join, Paginate, Pipeline, Stage, add_fields,
    additional_field, ascending, count, descending, exclude, first, group, include, join,
    match_stage, paginate, pipeline, sort,
};
pub use value::Value;
