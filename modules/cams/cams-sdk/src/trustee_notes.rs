use cams_query::{Schema, document_fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::Auditable;
use crate::user::CamsUserReference;

/// Discriminator of trustee notes within the shared `trustees` collection.
pub const TRUSTEE_NOTE_DOCUMENT_TYPE: &str = "TRUSTEE_NOTE";

fn trustee_note_document_type() -> String {
    TRUSTEE_NOTE_DOCUMENT_TYPE.to_owned()
}

/// A note attached to a trustee. Archived notes carry `archived_on`/`archived_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrusteeNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "trustee_note_document_type")]
    pub document_type: String,
    pub trustee_id: String,
    pub title: String,
    pub content: String,
    pub created_on: DateTime<Utc>,
    pub created_by: CamsUserReference,
    pub updated_on: DateTime<Utc>,
    pub updated_by: CamsUserReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_by: Option<CamsUserReference>,
}

document_fields! {
    /// Stored attributes of [`TrusteeNote`].
    pub enum TrusteeNoteField {
        Id => "id",
        DocumentType => "documentType",
        TrusteeId => "trusteeId",
        Title => "title",
        Content => "content",
        CreatedOn => "createdOn",
        UpdatedOn => "updatedOn",
        ArchivedOn => "archivedOn",
    }
}

impl Schema for TrusteeNote {
    type Field = TrusteeNoteField;
}

impl Auditable for TrusteeNote {
    fn stamp_created(&mut self, user: &CamsUserReference, at: DateTime<Utc>) {
        self.created_on = at;
        self.created_by = user.clone();
    }

    fn stamp_updated(&mut self, user: &CamsUserReference, at: DateTime<Utc>) {
        self.updated_on = at;
        self.updated_by = user.clone();
    }
}

/// Caller-supplied content of a new note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrusteeNoteInput {
    pub trustee_id: String,
    pub title: String,
    pub content: String,
}

impl TrusteeNote {
    /// A new, unsaved note authored by `user` at `at`.
    #[must_use]
    pub fn from_input(input: TrusteeNoteInput, user: &CamsUserReference, at: DateTime<Utc>) -> Self {
        crate::audit::create_audit_record(
            Self {
                id: None,
                document_type: trustee_note_document_type(),
                trustee_id: input.trustee_id,
                title: input.title,
                content: input.content,
                created_on: at,
                created_by: user.clone(),
                updated_on: at,
                updated_by: user.clone(),
                archived_on: None,
                archived_by: None,
            },
            user,
            at,
        )
    }
}

/// Edit of an existing note. `id` and `trustee_id` locate the note and are not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrusteeNoteUpdate {
    pub id: String,
    pub trustee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub updated_on: DateTime<Utc>,
    pub updated_by: CamsUserReference,
}

/// Soft deletion of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrusteeNoteArchival {
    pub id: String,
    pub trustee_id: String,
    pub archived_on: DateTime<Utc>,
    pub archived_by: CamsUserReference,
}
