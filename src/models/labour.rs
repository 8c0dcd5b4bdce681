//! Labourer model and attendance event types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A login/logout event tied to a project, as submitted by a client.
///
/// This is the single canonical event schema; `isLoggedOut` is optional and
/// defaults to "not logged out". When both flags are set, logged-out takes
/// precedence: the resolved state is `isLogin && !isLoggedOut`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    /// The project the event is scoped to.
    pub project_id: String,
    /// Whether the labourer logged in.
    pub is_login: bool,
    /// Whether the labourer logged out. Optional; absent means false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_logged_out: Option<bool>,
}

impl AttendanceEvent {
    /// The login state this event resolves to.
    ///
    /// # Example
    ///
    /// ```
    /// use buildtrack::models::AttendanceEvent;
    ///
    /// let event = AttendanceEvent {
    ///     project_id: "p1".to_string(),
    ///     is_login: true,
    ///     is_logged_out: Some(true),
    /// };
    /// assert!(!event.resolved_login());
    /// ```
    pub fn resolved_login(&self) -> bool {
        self.is_login && !self.is_logged_out.unwrap_or(false)
    }
}

/// One immutable entry in a labourer's attendance history.
///
/// Entries are append-only: the reconciler extends the sequence and never
/// rewrites or deletes what is already recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    /// The project the event was scoped to.
    pub project_id: String,
    /// The submitted login flag.
    pub is_login: bool,
    /// The submitted logout flag, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_logged_out: Option<bool>,
    /// When the event was recorded.
    pub time: DateTime<Utc>,
}

impl AttendanceEntry {
    /// Builds the audit entry for an event, stamped with the given time.
    pub fn from_event(event: &AttendanceEvent, time: DateTime<Utc>) -> Self {
        Self {
            project_id: event.project_id.clone(),
            is_login: event.is_login,
            is_logged_out: event.is_logged_out,
            time,
        }
    }
}

/// A labourer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Labour {
    /// Generated document id.
    #[serde(default)]
    pub id: String,
    /// The owning user's id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The labourer's name.
    pub name: String,
    /// Daily wages, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wages: Option<Decimal>,
    /// Contact number.
    pub contact: String,
    /// National identity number.
    pub adhaar_no: String,
    /// The labourer's role on site (e.g. "mason").
    pub role: String,
    /// Current login state, recomputed by the attendance reconciler.
    #[serde(default)]
    pub is_logged_in: bool,
    /// Append-only attendance history.
    #[serde(default)]
    pub attendance: Vec<AttendanceEntry>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(is_login: bool, is_logged_out: Option<bool>) -> AttendanceEvent {
        AttendanceEvent {
            project_id: "proj_1".to_string(),
            is_login,
            is_logged_out,
        }
    }

    #[test]
    fn test_resolved_login_plain_login() {
        assert!(event(true, None).resolved_login());
        assert!(event(true, Some(false)).resolved_login());
    }

    #[test]
    fn test_resolved_login_logout_takes_precedence() {
        assert!(!event(true, Some(true)).resolved_login());
    }

    #[test]
    fn test_resolved_login_not_logged_in() {
        assert!(!event(false, None).resolved_login());
        assert!(!event(false, Some(true)).resolved_login());
    }

    #[test]
    fn test_attendance_entry_carries_event_fields() {
        let now = Utc::now();
        let entry = AttendanceEntry::from_event(&event(true, Some(false)), now);
        assert_eq!(entry.project_id, "proj_1");
        assert!(entry.is_login);
        assert_eq!(entry.is_logged_out, Some(false));
        assert_eq!(entry.time, now);
    }

    #[test]
    fn test_labour_round_trips_camel_case() {
        let json = r#"{
            "id": "lab_1",
            "userId": "u1",
            "name": "Ravi",
            "wages": "450",
            "contact": "9876543210",
            "adhaarNo": "1234-5678-9012",
            "role": "mason",
            "isLoggedIn": false,
            "attendance": [],
            "createdAt": "2026-01-10T08:00:00Z"
        }"#;
        let labour: Labour = serde_json::from_str(json).unwrap();
        assert_eq!(labour.adhaar_no, "1234-5678-9012");
        assert!(!labour.is_logged_in);

        let value = serde_json::to_value(&labour).unwrap();
        assert!(value.get("adhaarNo").is_some());
        assert!(value.get("isLoggedIn").is_some());
    }

    #[test]
    fn test_event_without_logout_flag_deserializes() {
        let json = r#"{"projectId": "p1", "isLogin": true}"#;
        let event: AttendanceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.is_logged_out, None);
        assert!(event.resolved_login());
    }
}
