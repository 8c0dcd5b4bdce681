//! Request types for the backend API.
//!
//! Wire field names are camelCase. Query parameters use dedicated structs
//! so handlers get typed extraction with the same naming convention.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{
    AttendanceEvent, EstimateRequest, EstimateResult, MaterialUsage, ProjectLabour,
};

/// Body for `POST /saveEstimate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEstimateRequest {
    /// The owning user, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The request the estimate was computed from.
    pub input: EstimateRequest,
    /// The computed result, persisted verbatim.
    pub result: EstimateResult,
}

/// Body for `POST /prices`: merge-upsert of price catalog entries keyed by
/// material.
///
/// Entries are raw JSON objects, merged field-by-field into the stored
/// document. Fields absent from an entry are left untouched, so a payload
/// carrying only `brands` does not wipe the stored `locations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertPricesRequest {
    /// Material key to the fields to merge.
    pub prices: BTreeMap<String, Value>,
}

/// Body for `POST /coefficients`: merge-upsert of coefficient documents
/// keyed by project type, with the same partial-merge semantics as
/// [`UpsertPricesRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertCoefficientsRequest {
    /// Project type to the fields to merge.
    pub coefficients: BTreeMap<String, Value>,
}

/// Body for `POST /addLabour`.
///
/// `attendance` accepts arbitrary JSON entries; the handler keeps only the
/// ones that parse as valid attendance events and discards the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLabourRequest {
    /// The owning user's id.
    pub user_id: String,
    /// The labourer's name.
    pub name: String,
    /// Daily wages, optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wages: Option<Decimal>,
    /// Contact number.
    pub contact: String,
    /// National identity number.
    pub adhaar_no: String,
    /// Role on site.
    pub role: String,
    /// Seed attendance entries, filtered for validity.
    #[serde(default)]
    pub attendance: Vec<Value>,
    /// Initial login state.
    #[serde(default)]
    pub is_logged_in: bool,
}

impl AddLabourRequest {
    /// The attendance entries that parse as canonical events.
    pub fn valid_attendance(&self) -> Vec<AttendanceEvent> {
        self.attendance
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect()
    }
}

/// Body for `POST /addLabourAttendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    /// The labourer to record the event for.
    pub labour_id: String,
    /// The login/logout event.
    pub attendance: AttendanceEvent,
}

/// Body for `POST /addMaterial`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMaterialRequest {
    /// The owning user's id.
    pub user_id: String,
    /// The material name.
    pub material: String,
    /// Quantity on hand.
    pub quantity: Decimal,
    /// The unit the quantity is measured in.
    pub unit: String,
    /// Free-form status.
    pub status: String,
}

/// Body for `POST /updateMaterial`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialRequest {
    /// The inventory record to update.
    pub id: String,
    /// The material name.
    pub material: String,
    /// Quantity on hand.
    pub quantity: Decimal,
    /// The unit the quantity is measured in.
    pub unit: String,
    /// Free-form status.
    pub status: String,
}

/// Body for `POST /addProject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProjectRequest {
    /// The owning user's id.
    pub uid: String,
    /// Human-readable project name.
    pub project_name: String,
    /// Where the project is being built.
    pub location: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Planned start date; defaults to now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Planned end date; defaults to now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Whether the project starts out completed.
    #[serde(default)]
    pub is_completed: bool,
    /// Initial labour roster.
    #[serde(default)]
    pub project_labours: Vec<ProjectLabour>,
    /// Initial material usage entries.
    #[serde(default)]
    pub project_materials: Vec<MaterialUsage>,
}

/// Body for `POST /addLabourToProject`: replaces the roster wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterUpdateRequest {
    /// The project whose roster is replaced.
    pub project_id: String,
    /// The new roster.
    pub project_labours: Vec<ProjectLabour>,
}

/// Body for `POST /markProjectStatus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStatusRequest {
    /// The project to mark.
    pub project_id: String,
    /// The completion flag to set.
    #[serde(default)]
    pub is_completed: bool,
}

/// A material draw-down request: which inventory record to draw from and
/// how much. Extra descriptive fields (name, unit) ride along onto the
/// project's usage entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDraw {
    /// The inventory record to draw from.
    pub id: String,
    /// The quantity to draw.
    pub quantity: Decimal,
    /// Descriptive fields carried onto the usage entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for `POST /addMaterialToProject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMaterialToProjectRequest {
    /// The project drawing the material.
    pub project_id: String,
    /// The draw-down.
    pub project_material: MaterialDraw,
}

/// Body for `PUT /editMaterialInProject`: fields merged into the usage
/// entry with the matching id. Must contain an `id` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMaterialInProjectRequest {
    /// The project holding the usage entry.
    pub project_id: String,
    /// The fields to merge, including the target entry's `id`.
    pub updated_material: Map<String, Value>,
}

/// Body for `POST /registerId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// The bearer token to verify.
    pub token: String,
    /// Fallback phone number when the token carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Body for `POST /editProfile`: partial profile update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileRequest {
    /// The profile to edit.
    pub uid: String,
    /// New email, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New display name, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New phone number, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// New avatar URL, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Query string carrying a `userId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    /// The owning user's id.
    pub user_id: String,
}

/// Query string carrying a `uid`.
#[derive(Debug, Clone, Deserialize)]
pub struct UidQuery {
    /// The owning user's id.
    pub uid: String,
}

/// Query string carrying a `projectId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdQuery {
    /// The project id.
    pub project_id: String,
}

/// Query string carrying a `materialId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialIdQuery {
    /// The material inventory id.
    pub material_id: String,
}
