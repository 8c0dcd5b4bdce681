//! Labour attendance reconciliation.
//!
//! Recording an attendance event touches two documents: the labourer (audit
//! entry appended, `isLoggedIn` recomputed) and the project (the embedded
//! `projectLabours` roster entry for that labourer updated or inserted).
//! The roster is a denormalized projection of labourer login state; its
//! synchronization lives in exactly one function, [`sync_roster`], so the
//! invariant (one roster entry per recorded labourer, login flag equal to
//! the last reconciled state) is enforced in one place.
//!
//! The two writes are not atomic. [`record_attendance`] orders them labour
//! first, project second, and compensates by restoring the labourer's
//! previous state if the project write fails. A crash between the writes
//! still leaves the records inconsistent, and two concurrent reconciliations
//! for the same labourer can lose an update (read-modify-write with no
//! locking). Both limitations are documented store-contract behavior, not
//! bugs this module hides.

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEntry, AttendanceEvent, Labour, Project, ProjectLabour};
use crate::store::{DocumentStore, collections};

/// Upserts a labourer's login state into a project roster.
///
/// When an entry with the labourer's id exists, only its `isLoggedIn` field
/// is overwritten; every other field on the entry is preserved. Otherwise a
/// minimal `{id, isLoggedIn}` entry is appended.
pub fn sync_roster(roster: &mut Vec<ProjectLabour>, labour_id: &str, logged_in: bool) {
    match roster.iter_mut().find(|entry| entry.id == labour_id) {
        Some(entry) => entry.is_logged_in = logged_in,
        None => roster.push(ProjectLabour::minimal(labour_id, logged_in)),
    }
}

/// Records an attendance event and reconciles the labourer's login state
/// into the project roster.
///
/// Fails before any write when the labourer or the project does not exist.
/// On success returns the freshly reloaded labourer record.
pub async fn record_attendance(
    store: &DocumentStore,
    labour_id: &str,
    event: &AttendanceEvent,
) -> EngineResult<Labour> {
    if labour_id.trim().is_empty() {
        return Err(EngineError::validation("labourId", "is required"));
    }
    if event.project_id.trim().is_empty() {
        return Err(EngineError::validation("attendance.projectId", "is required"));
    }

    let labour_doc = store
        .get(collections::LABOURS, labour_id)
        .await?
        .ok_or_else(|| EngineError::not_found("labour", labour_id))?;
    let labour: Labour = serde_json::from_value(labour_doc).map_err(|e| EngineError::Storage {
        message: format!("malformed labour document '{labour_id}': {e}"),
    })?;

    let project_doc = store
        .get(collections::PROJECTS, &event.project_id)
        .await?
        .ok_or_else(|| EngineError::not_found("project", &event.project_id))?;
    let project: Project =
        serde_json::from_value(project_doc).map_err(|e| EngineError::Storage {
            message: format!("malformed project document '{}': {e}", event.project_id),
        })?;

    let new_state = event.resolved_login();
    let entry = AttendanceEntry::from_event(event, Utc::now());

    // Keep the previous labour fields so the labour write can be undone if
    // the roster write fails.
    let previous_state = labour.is_logged_in;
    let previous_attendance = serde_json::to_value(&labour.attendance).unwrap_or(json!([]));

    let mut attendance = labour.attendance;
    attendance.push(entry);

    store
        .update(
            collections::LABOURS,
            labour_id,
            json!({
                "isLoggedIn": new_state,
                "attendance": serde_json::to_value(&attendance).map_err(|e| {
                    EngineError::Storage {
                        message: format!("failed to serialize attendance: {e}"),
                    }
                })?,
            }),
        )
        .await?;

    let mut roster = project.project_labours;
    sync_roster(&mut roster, labour_id, new_state);
    let roster_value = serde_json::to_value(&roster).map_err(|e| EngineError::Storage {
        message: format!("failed to serialize roster: {e}"),
    })?;

    if let Err(err) = store
        .update(
            collections::PROJECTS,
            &event.project_id,
            json!({"projectLabours": roster_value}),
        )
        .await
    {
        // Compensation: put the labourer back the way it was. Best effort;
        // if this also fails the two records are left inconsistent, which
        // is the accepted non-transactional risk.
        warn!(
            labour_id,
            project_id = %event.project_id,
            error = %err,
            "roster write failed, reverting labour update"
        );
        if let Err(revert_err) = store
            .update(
                collections::LABOURS,
                labour_id,
                json!({
                    "isLoggedIn": previous_state,
                    "attendance": previous_attendance,
                }),
            )
            .await
        {
            warn!(
                labour_id,
                error = %revert_err,
                "compensating labour revert failed; records are inconsistent"
            );
        }
        return Err(err);
    }

    info!(
        labour_id,
        project_id = %event.project_id,
        logged_in = new_state,
        "attendance recorded"
    );

    let updated = store
        .get(collections::LABOURS, labour_id)
        .await?
        .ok_or_else(|| EngineError::not_found("labour", labour_id))?;
    serde_json::from_value(updated).map_err(|e| EngineError::Storage {
        message: format!("malformed labour document '{labour_id}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn event(is_login: bool, is_logged_out: Option<bool>, project_id: &str) -> AttendanceEvent {
        AttendanceEvent {
            project_id: project_id.to_string(),
            is_login,
            is_logged_out,
        }
    }

    async fn setup() -> (DocumentStore, String, String) {
        let store = DocumentStore::new();
        let labour_id = store
            .add(
                collections::LABOURS,
                json!({
                    "name": "Ravi",
                    "contact": "9876543210",
                    "adhaarNo": "1234-5678-9012",
                    "role": "mason",
                    "isLoggedIn": false,
                    "attendance": [],
                    "createdAt": "2026-01-10T08:00:00Z"
                }),
            )
            .await
            .unwrap();
        let project_id = store
            .add(
                collections::PROJECTS,
                json!({
                    "uid": "u1",
                    "projectName": "Villa",
                    "location": "Riyadh",
                    "startDate": "2026-01-01T00:00:00Z",
                    "endDate": "2026-06-01T00:00:00Z",
                    "isCompleted": false,
                    "projectLabours": [],
                    "projectMaterials": [],
                    "createdAt": "2026-01-01T00:00:00Z"
                }),
            )
            .await
            .unwrap();
        (store, labour_id, project_id)
    }

    async fn roster_of(store: &DocumentStore, project_id: &str) -> Vec<Value> {
        let doc = store
            .get(collections::PROJECTS, project_id)
            .await
            .unwrap()
            .unwrap();
        doc["projectLabours"].as_array().unwrap().clone()
    }

    #[test]
    fn test_sync_roster_inserts_minimal_entry() {
        let mut roster = Vec::new();
        sync_roster(&mut roster, "lab_1", true);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, "lab_1");
        assert!(roster[0].is_logged_in);
    }

    #[test]
    fn test_sync_roster_overwrites_only_login_flag() {
        let mut entry = ProjectLabour::minimal("lab_1", true);
        entry
            .extra
            .insert("shift".to_string(), json!("night"));
        let mut roster = vec![entry];

        sync_roster(&mut roster, "lab_1", false);

        assert_eq!(roster.len(), 1);
        assert!(!roster[0].is_logged_in);
        assert_eq!(roster[0].extra.get("shift"), Some(&json!("night")));
    }

    #[test]
    fn test_sync_roster_never_duplicates_an_id() {
        let mut roster = Vec::new();
        sync_roster(&mut roster, "lab_1", true);
        sync_roster(&mut roster, "lab_1", false);
        sync_roster(&mut roster, "lab_1", true);
        assert_eq!(roster.len(), 1);
        assert!(roster[0].is_logged_in);
    }

    #[tokio::test]
    async fn test_login_updates_both_records() {
        let (store, labour_id, project_id) = setup().await;

        let updated =
            record_attendance(&store, &labour_id, &event(true, Some(false), &project_id))
                .await
                .unwrap();

        assert!(updated.is_logged_in);
        assert_eq!(updated.attendance.len(), 1);
        assert_eq!(updated.attendance[0].project_id, project_id);

        let roster = roster_of(&store, &project_id).await;
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0]["id"], labour_id.as_str());
        assert_eq!(roster[0]["isLoggedIn"], true);
    }

    #[tokio::test]
    async fn test_logout_flips_both_and_appends() {
        let (store, labour_id, project_id) = setup().await;

        record_attendance(&store, &labour_id, &event(true, Some(false), &project_id))
            .await
            .unwrap();
        let first_entry_time = {
            let doc = store
                .get(collections::LABOURS, &labour_id)
                .await
                .unwrap()
                .unwrap();
            doc["attendance"][0]["time"].clone()
        };

        let updated =
            record_attendance(&store, &labour_id, &event(true, Some(true), &project_id))
                .await
                .unwrap();

        assert!(!updated.is_logged_in);
        assert_eq!(updated.attendance.len(), 2);

        // First audit entry unchanged.
        let doc = store
            .get(collections::LABOURS, &labour_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["attendance"][0]["time"], first_entry_time);
        assert_eq!(doc["attendance"][0]["isLogin"], true);

        let roster = roster_of(&store, &project_id).await;
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0]["isLoggedIn"], false);
    }

    #[tokio::test]
    async fn test_replay_is_idempotent_on_state_but_appends_audit() {
        let (store, labour_id, project_id) = setup().await;
        let login = event(true, Some(false), &project_id);

        let first = record_attendance(&store, &labour_id, &login).await.unwrap();
        let second = record_attendance(&store, &labour_id, &login).await.unwrap();

        assert_eq!(first.is_logged_in, second.is_logged_in);
        assert_eq!(second.attendance.len(), 2);

        let roster = roster_of(&store, &project_id).await;
        assert_eq!(roster.len(), 1);
    }

    #[tokio::test]
    async fn test_logged_out_takes_precedence_within_event() {
        let (store, labour_id, project_id) = setup().await;
        let updated =
            record_attendance(&store, &labour_id, &event(true, Some(true), &project_id))
                .await
                .unwrap();
        assert!(!updated.is_logged_in);
    }

    #[tokio::test]
    async fn test_missing_labour_fails_and_leaves_project_untouched() {
        let (store, _labour_id, project_id) = setup().await;

        let err = record_attendance(&store, "ghost", &event(true, None, &project_id))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let roster = roster_of(&store, &project_id).await;
        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn test_missing_project_fails_before_any_write() {
        let (store, labour_id, _project_id) = setup().await;

        let err = record_attendance(&store, &labour_id, &event(true, None, "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));

        let doc = store
            .get(collections::LABOURS, &labour_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["isLoggedIn"], false);
        assert!(doc["attendance"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_ids_are_validation_errors() {
        let (store, _labour_id, project_id) = setup().await;
        let err = record_attendance(&store, "  ", &event(true, None, &project_id))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));

        let (store, labour_id, _project_id) = setup().await;
        let err = record_attendance(&store, &labour_id, &event(true, None, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_interleaved_reconciliations_lose_an_update() {
        // Two reconcilers read the same labour snapshot; the one that
        // writes last clobbers the other's audit entry. The store offers
        // no locking, so this is the accepted last-write-wins outcome.
        let (store, labour_id, project_id) = setup().await;

        let stale_snapshot = store
            .get(collections::LABOURS, &labour_id)
            .await
            .unwrap()
            .unwrap();

        record_attendance(&store, &labour_id, &event(true, Some(false), &project_id))
            .await
            .unwrap();

        // The second reconciler writes the state it derived from the stale
        // snapshot, exactly the update sequence record_attendance issues.
        store
            .update(
                collections::LABOURS,
                &labour_id,
                json!({
                    "isLoggedIn": false,
                    "attendance": stale_snapshot["attendance"].clone(),
                }),
            )
            .await
            .unwrap();

        let doc = store
            .get(collections::LABOURS, &labour_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["isLoggedIn"], false);
        // The first reconciliation's audit entry is gone.
        assert!(doc["attendance"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_roster_entry_extras_survive_reconciliation() {
        let (store, labour_id, project_id) = setup().await;
        store
            .update(
                collections::PROJECTS,
                &project_id,
                json!({"projectLabours": [{"id": labour_id, "isLoggedIn": false, "shift": "night"}]}),
            )
            .await
            .unwrap();

        record_attendance(&store, &labour_id, &event(true, Some(false), &project_id))
            .await
            .unwrap();

        let roster = roster_of(&store, &project_id).await;
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0]["isLoggedIn"], true);
        assert_eq!(roster[0]["shift"], "night");
    }

    #[tokio::test]
    async fn test_event_without_logout_flag_uses_login_only() {
        let (store, labour_id, project_id) = setup().await;
        let updated = record_attendance(&store, &labour_id, &event(true, None, &project_id))
            .await
            .unwrap();
        assert!(updated.is_logged_in);
        assert_eq!(updated.attendance[0].is_logged_out, None);
    }
}
