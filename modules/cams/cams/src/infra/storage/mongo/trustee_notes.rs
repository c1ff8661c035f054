use std::sync::Arc;

use async_trait::async_trait;
use cams_db::{Closeable, DocumentCollectionAdapter, DocumentStore, patch_from};
use cams_errors::{CamsError, get_cams_error, get_cams_error_with_stack};
use cams_query::{ConditionOrConjunction, QueryError, SortDirection, and, order_by, using};
use cams_sdk::{
    TRUSTEE_NOTE_DOCUMENT_TYPE, TrusteeNote, TrusteeNoteArchival, TrusteeNoteField,
    TrusteeNoteUpdate,
};
use tracing::instrument;

use super::collections;
use super::module_names::TRUSTEE_NOTES as MODULE_NAME;
use crate::domain::repo::TrusteeNotesRepository;

/// Attributes locating a note; they are never part of an update.
const KEY_FIELDS: &[&str] = &["id", "trusteeId"];

fn wrap(err: anyhow::Error) -> CamsError {
    get_cams_error(err, MODULE_NAME)
}

fn with_stack(message: &str) -> impl FnOnce(anyhow::Error) -> CamsError + '_ {
    move |err| get_cams_error_with_stack(err, MODULE_NAME, message)
}

/// `documentType` + `trusteeId` + `id`.
fn note_key(
    trustee_id: &str,
    id: &str,
) -> Result<ConditionOrConjunction<TrusteeNoteField>, QueryError> {
    let doc = using::<TrusteeNoteField>();
    and([
        doc(TrusteeNoteField::DocumentType).equals(TRUSTEE_NOTE_DOCUMENT_TYPE),
        doc(TrusteeNoteField::TrusteeId).equals(trustee_id),
        doc(TrusteeNoteField::Id).equals(id),
    ])
    .map(Into::into)
}

/// Trustee notes stored alongside other trustee documents in the `trustees` collection.
pub struct TrusteeNotesMongoRepository {
    adapter: Arc<dyn DocumentCollectionAdapter<TrusteeNote>>,
    connection: Box<dyn Closeable>,
}

impl TrusteeNotesMongoRepository {
    #[must_use]
    pub fn new<S: DocumentStore>(store: S) -> Self {
        let adapter = store.adapter(MODULE_NAME, collections::TRUSTEES);
        Self::with_adapter(adapter, Box::new(store))
    }

    #[must_use]
    pub fn with_adapter(
        adapter: Arc<dyn DocumentCollectionAdapter<TrusteeNote>>,
        connection: Box<dyn Closeable>,
    ) -> Self {
        Self {
            adapter,
            connection,
        }
    }

    async fn update_note(
        &self,
        trustee_id: &str,
        id: &str,
        patch: cams_db::DocumentPatch,
        failure: &str,
    ) -> Result<(), CamsError> {
        let key = note_key(trustee_id, id).map_err(|e| wrap(e.into()))?;
        let result = self
            .adapter
            .update_one(key, patch)
            .await
            .map_err(with_stack(failure))?;
        if result.matched_count == 0 {
            return Err(CamsError::not_found(
                MODULE_NAME,
                format!("Trustee note {id} not found."),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Closeable for TrusteeNotesMongoRepository {
    async fn close(&self) {
        self.connection.close().await;
    }
}

#[async_trait]
impl TrusteeNotesRepository for TrusteeNotesMongoRepository {
    #[instrument(name = "cams.trustee_notes.create", skip_all, fields(db.system = "mongodb", db.operation = "insertOne", trustee_id = %note.trustee_id))]
    async fn create(&self, note: TrusteeNote) -> Result<TrusteeNote, CamsError> {
        let id = self
            .adapter
            .insert_one(note.clone())
            .await
            .map_err(with_stack("Unable to create trustee note."))?;
        Ok(TrusteeNote { id: Some(id), ..note })
    }

    #[instrument(name = "cams.trustee_notes.read", skip_all, fields(db.system = "mongodb", db.operation = "findOne", note_id = %id))]
    async fn read(&self, id: &str) -> Result<Option<TrusteeNote>, CamsError> {
        let doc = using::<TrusteeNoteField>();
        let query = and([
            doc(TrusteeNoteField::DocumentType).equals(TRUSTEE_NOTE_DOCUMENT_TYPE),
            doc(TrusteeNoteField::Id).equals(id),
        ])
        .map_err(|e| wrap(e.into()))?;
        self.adapter.find_one(query.into()).await.map_err(wrap)
    }

    #[instrument(name = "cams.trustee_notes.update", skip_all, fields(db.system = "mongodb", db.operation = "updateOne", note_id = %update.id))]
    async fn update(&self, update: TrusteeNoteUpdate) -> Result<(), CamsError> {
        let failure = format!("Failed to update trustee note {}.", update.id);
        let patch = patch_from(&update, KEY_FIELDS).map_err(with_stack(&failure))?;
        self.update_note(&update.trustee_id, &update.id, patch, &failure)
            .await
    }

    #[instrument(name = "cams.trustee_notes.archive", skip_all, fields(db.system = "mongodb", db.operation = "updateOne", note_id = %archival.id))]
    async fn archive_trustee_note(&self, archival: TrusteeNoteArchival) -> Result<(), CamsError> {
        let failure = "Unable to archive trustee note.";
        let patch = patch_from(&archival, KEY_FIELDS).map_err(with_stack(failure))?;
        self.update_note(&archival.trustee_id, &archival.id, patch, failure)
            .await
    }

    #[instrument(name = "cams.trustee_notes.by_trustee", skip_all, fields(db.system = "mongodb", db.operation = "find", trustee_id = %trustee_id))]
    async fn get_notes_by_trustee_id(
        &self,
        trustee_id: &str,
    ) -> Result<Vec<TrusteeNote>, CamsError> {
        let failure = "Unable to retrieve trustee notes.";
        let doc = using::<TrusteeNoteField>();
        let query = and([
            doc(TrusteeNoteField::DocumentType).equals(TRUSTEE_NOTE_DOCUMENT_TYPE),
            doc(TrusteeNoteField::TrusteeId).equals(trustee_id),
            doc(TrusteeNoteField::ArchivedOn).not_exists(),
        ])
        .map_err(|e| get_cams_error_with_stack(e.into(), MODULE_NAME, failure))?;
        let sort = order_by([(TrusteeNoteField::UpdatedOn, SortDirection::Descending)]);
        self.adapter
            .find(Some(query.into()), Some(sort))
            .await
            .map_err(with_stack(failure))
    }
}
