//! Project model and its embedded roster/material projections.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry in a project's embedded labour roster.
///
/// This is a read-optimized projection of labourer login state scoped to the
/// project. It is kept in sync by the attendance reconciler, which overwrites
/// only `isLoggedIn` and preserves every other field a client may have put on
/// the entry (captured in `extra`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLabour {
    /// The labourer's document id.
    pub id: String,
    /// The labourer's login state as of the last reconciliation.
    #[serde(default)]
    pub is_logged_in: bool,
    /// Any additional fields present on the roster entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectLabour {
    /// A minimal roster entry for a labourer not yet on the roster.
    pub fn minimal(id: impl Into<String>, is_logged_in: bool) -> Self {
        Self {
            id: id.into(),
            is_logged_in,
            extra: Map::new(),
        }
    }
}

/// A material drawn into a project from the inventory.
///
/// The entry carries its own generated id; `materialId` points back at the
/// inventory record the quantity was drawn down from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsage {
    /// Generated id for this usage entry.
    #[serde(default)]
    pub id: String,
    /// The inventory record the quantity was drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    /// The quantity drawn into the project.
    pub quantity: Decimal,
    /// Any additional fields (material name, unit, notes).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A construction project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Generated document id.
    #[serde(default)]
    pub id: String,
    /// The owning user's id.
    pub uid: String,
    /// Human-readable project name.
    pub project_name: String,
    /// Where the project is being built.
    pub location: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Planned start date.
    pub start_date: DateTime<Utc>,
    /// Planned end date.
    pub end_date: DateTime<Utc>,
    /// Whether the project has been marked complete.
    #[serde(default)]
    pub is_completed: bool,
    /// Embedded labour roster, keyed by labourer id.
    #[serde(default)]
    pub project_labours: Vec<ProjectLabour>,
    /// Materials drawn into the project.
    #[serde(default)]
    pub project_materials: Vec<MaterialUsage>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roster_entry_preserves_unknown_fields() {
        let json = r#"{"id": "lab_1", "isLoggedIn": true, "shift": "night"}"#;
        let entry: ProjectLabour = serde_json::from_str(json).unwrap();
        assert_eq!(entry.extra.get("shift"), Some(&json!("night")));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["shift"], "night");
        assert_eq!(value["isLoggedIn"], true);
    }

    #[test]
    fn test_minimal_roster_entry_has_no_extras() {
        let entry = ProjectLabour::minimal("lab_2", false);
        assert_eq!(entry.id, "lab_2");
        assert!(!entry.is_logged_in);
        assert!(entry.extra.is_empty());
    }

    #[test]
    fn test_project_defaults_empty_collections() {
        let json = r#"{
            "id": "proj_1",
            "uid": "u1",
            "projectName": "Villa",
            "location": "Riyadh",
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-06-01T00:00:00Z",
            "createdAt": "2026-01-01T00:00:00Z"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.project_labours.is_empty());
        assert!(project.project_materials.is_empty());
        assert!(!project.is_completed);
    }

    #[test]
    fn test_material_usage_keeps_descriptive_fields() {
        let json = r#"{"id": "use_1", "materialId": "mat_1", "quantity": "25", "unit": "bag"}"#;
        let usage: MaterialUsage = serde_json::from_str(json).unwrap();
        assert_eq!(usage.quantity, Decimal::from(25));
        assert_eq!(usage.extra.get("unit"), Some(&json!("bag")));
    }
}
