#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::super::recording::{Call, CountingConnection, Failure, RecordingAdapter, Responses};
    use super::super::*;
    use crate::domain::repo::TrusteeNotesRepository;
    use cams_errors::{CamsError, ErrorKind};
    use cams_sdk::{
        CamsUserReference, TrusteeNote, TrusteeNoteArchival, TrusteeNoteInput, TrusteeNoteUpdate,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;

    fn user() -> CamsUserReference {
        CamsUserReference::new("u-1", "Ada Lovelace")
    }

    fn note() -> TrusteeNote {
        TrusteeNote::from_input(
            TrusteeNoteInput {
                trustee_id: "t-1".to_owned(),
                title: "Annual review".to_owned(),
                content: "Reviewed the panel file.".to_owned(),
            },
            &user(),
            Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
        )
    }

    fn repo(adapter: &Arc<RecordingAdapter<TrusteeNote>>) -> TrusteeNotesMongoRepository {
        TrusteeNotesMongoRepository::with_adapter(
            adapter.clone(),
            Box::new(CountingConnection::default()),
        )
    }

    #[tokio::test]
    async fn create_returns_note_with_id() {
        let adapter = RecordingAdapter::new();
        let created = repo(&adapter).create(note()).await.unwrap();

        assert_eq!(created.id.as_deref(), Some("id-1"));
        assert_eq!(created.trustee_id, "t-1");
        assert!(matches!(adapter.take_calls().as_slice(), [Call::InsertOne(n)] if n.id.is_none()));
    }

    #[tokio::test]
    async fn create_failure_carries_message() {
        let adapter = RecordingAdapter::failing(Failure::Foreign("write conflict".to_owned()));
        let err = repo(&adapter).create(note()).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.message, "Unable to create trustee note.");
        assert_eq!(err.module, module_names::TRUSTEE_NOTES);
    }

    #[tokio::test]
    async fn notes_by_trustee_exclude_archived_and_sort_newest_first() {
        let adapter = RecordingAdapter::new();
        repo(&adapter).get_notes_by_trustee_id("t-1").await.unwrap();

        let calls = adapter.take_calls();
        let [Call::Find { query: Some(query), sort: Some(sort) }] = calls.as_slice() else {
            panic!("expected a filtered, sorted find");
        };
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({
                "conjunction": "AND",
                "values": [
                    { "condition": "EQUALS", "leftOperand": { "name": "documentType" }, "rightOperand": "TRUSTEE_NOTE" },
                    { "condition": "EQUALS", "leftOperand": { "name": "trusteeId" }, "rightOperand": "t-1" },
                    { "condition": "NOT_EXISTS", "leftOperand": { "name": "archivedOn" } }
                ]
            })
        );
        assert_eq!(
            serde_json::to_value(sort).unwrap(),
            json!({ "attributes": [{ "field": { "name": "updatedOn" }, "direction": "DESCENDING" }] })
        );
    }

    #[tokio::test]
    async fn update_sets_only_changed_fields() {
        let adapter = RecordingAdapter::new();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let update = TrusteeNoteUpdate {
            id: "n-1".to_owned(),
            trustee_id: "t-1".to_owned(),
            title: None,
            content: Some("Updated content.".to_owned()),
            updated_on: at,
            updated_by: user(),
        };

        repo(&adapter).update(update).await.unwrap();

        let calls = adapter.take_calls();
        let [Call::UpdateOne { query, patch }] = calls.as_slice() else {
            panic!("expected a single update_one");
        };
        let mut keys: Vec<&str> = patch.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["content", "updatedBy", "updatedOn"]);
        let values = &serde_json::to_value(query).unwrap()["values"];
        assert_eq!(values[2]["rightOperand"], "n-1");
    }

    #[tokio::test]
    async fn update_of_unknown_note_is_not_found() {
        let adapter = RecordingAdapter::with_responses(Responses {
            matched_count: 0,
            ..Responses::default()
        });
        let update = TrusteeNoteUpdate {
            id: "n-404".to_owned(),
            trustee_id: "t-1".to_owned(),
            title: Some("x".to_owned()),
            content: None,
            updated_on: Utc::now(),
            updated_by: user(),
        };

        let err = repo(&adapter).update(update).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_failure_records_stack_on_cams_error() {
        let adapter = RecordingAdapter::failing(Failure::Cams(CamsError::forbidden("DB", "denied")));
        let update = TrusteeNoteUpdate {
            id: "n-1".to_owned(),
            trustee_id: "t-1".to_owned(),
            title: None,
            content: None,
            updated_on: Utc::now(),
            updated_by: user(),
        };

        let err = repo(&adapter).update(update).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "denied");
        assert_eq!(err.cams_stack.len(), 1);
        assert_eq!(err.cams_stack[0].message, "Failed to update trustee note n-1.");
    }

    #[tokio::test]
    async fn archive_sets_archival_fields_only() {
        let adapter = RecordingAdapter::new();
        let archival = TrusteeNoteArchival {
            id: "n-1".to_owned(),
            trustee_id: "t-1".to_owned(),
            archived_on: Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap(),
            archived_by: user(),
        };

        repo(&adapter).archive_trustee_note(archival).await.unwrap();

        let calls = adapter.take_calls();
        let [Call::UpdateOne { patch, .. }] = calls.as_slice() else {
            panic!("expected a single update_one");
        };
        let mut keys: Vec<&str> = patch.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["archivedBy", "archivedOn"]);
        assert_eq!(patch["archivedBy"]["id"], "u-1");
    }
}
