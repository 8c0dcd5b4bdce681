//! Material inventory record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A material inventory record.
///
/// `quantity` is decremented when the material is drawn into a project.
/// The draw-down is not guarded against going negative; the inventory is a
/// running tally, not a reservation system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Generated document id.
    #[serde(default)]
    pub id: String,
    /// The owning user's id.
    pub user_id: String,
    /// The material name (e.g. "cement").
    pub material: String,
    /// Quantity on hand.
    pub quantity: Decimal,
    /// The unit the quantity is measured in.
    pub unit: String,
    /// Free-form status (e.g. "ordered", "delivered").
    pub status: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
