//! Error model shared by the CAMS persistence crates
//!
//! This crate provides:
//! - `CamsError`, the error value surfaced to API callers
//! - `ErrorKind`, the closed set of error categories and their HTTP status
//! - `get_cams_error` / `get_cams_error_with_stack`, which turn arbitrary failures into
//!   `CamsError` values tagged with the originating module
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod error;
pub mod wrap;

pub use error::{CamsError, CamsStackEntry, ErrorKind, UNKNOWN_ERROR_MESSAGE};
pub use wrap::{get_cams_error, get_cams_error_with_stack};
