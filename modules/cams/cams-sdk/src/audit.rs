use chrono::{DateTime, Utc};

use crate::user::CamsUserReference;

/// Records carrying created/updated stamps.
pub trait Auditable {
    fn stamp_created(&mut self, user: &CamsUserReference, at: DateTime<Utc>);
    fn stamp_updated(&mut self, user: &CamsUserReference, at: DateTime<Utc>);
}

/// Stamp a new record as created and last updated by `user` at `at`.
#[must_use]
pub fn create_audit_record<T: Auditable>(
    mut record: T,
    user: &CamsUserReference,
    at: DateTime<Utc>,
) -> T {
    record.stamp_created(user, at);
    record.stamp_updated(user, at);
    record
}
