//! CAMS persistence module.
//!
//! Repositories for transfer orders, consolidation orders, trustee notes and office
//! assignees, built on the `cams_db` document adapters. [`RepositoryFactory`] is the
//! composition root: it owns one shared, reference-counted instance per repository.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub use cams_sdk::{
    CamsUserReference, ConsolidationOrder, ConsolidationOrderUpdate, OfficeAssignee,
    OfficeAssigneePredicate, OrdersSearchPredicate, TransferOrder, TransferOrderAction,
    TrusteeNote, TrusteeNoteArchival, TrusteeNoteUpdate,
};

pub mod config;
pub mod domain;
pub mod factory;
pub mod infra;
pub mod logging;

pub use config::{CamsConfig, ConfigError, LogFormat, LoggingConfig};
pub use domain::repo::{
    ConsolidationOrdersRepository, OfficeAssigneesRepository, OrdersRepository,
    TrusteeNotesRepository, UpdateOutcome,
};
pub use factory::RepositoryFactory;
