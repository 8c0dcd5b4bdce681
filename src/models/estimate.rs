//! Estimate request and result models.
//!
//! These types are both the API surface of the `/estimateMaterialCost`
//! endpoint and the payload persisted verbatim by `/saveEstimate`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The kind of construction project being estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Residential construction.
    Residential,
    /// Commercial construction.
    Commercial,
}

impl ProjectType {
    /// The key under which this project type's coefficients are stored.
    pub fn as_key(&self) -> &'static str {
        match self {
            ProjectType::Residential => "residential",
            ProjectType::Commercial => "commercial",
        }
    }
}

/// The quality tier the estimate is priced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Lowest consumption rates and finish.
    Economy,
    /// Default consumption rates and finish.
    Standard,
    /// Highest consumption rates and finish.
    Premium,
}

impl QualityTier {
    /// The key under which this tier appears inside a coefficient document.
    pub fn as_key(&self) -> &'static str {
        match self {
            QualityTier::Economy => "economy",
            QualityTier::Standard => "standard",
            QualityTier::Premium => "premium",
        }
    }
}

/// Request body for the `/estimateMaterialCost` endpoint.
///
/// Unrecognized `projectType`/`quality` values are rejected during
/// deserialization, before the engine touches the store; the remaining
/// range checks live in [`EstimateRequest::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    /// The kind of project.
    pub project_type: ProjectType,
    /// The built-up area of one floor, in square feet.
    pub area_sqft: Decimal,
    /// Number of floors. The total area is `area_sqft * floors`.
    pub floors: u32,
    /// The quality tier to price for.
    pub quality: QualityTier,
    /// The location used to select price multipliers.
    pub location: String,
}

impl EstimateRequest {
    /// Checks the range constraints the type system cannot express.
    ///
    /// # Example
    ///
    /// ```
    /// use buildtrack::models::{EstimateRequest, ProjectType, QualityTier};
    /// use rust_decimal::Decimal;
    ///
    /// let request = EstimateRequest {
    ///     project_type: ProjectType::Residential,
    ///     area_sqft: Decimal::from(1000),
    ///     floors: 2,
    ///     quality: QualityTier::Standard,
    ///     location: "Riyadh".to_string(),
    /// };
    /// assert!(request.validate().is_ok());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.area_sqft <= Decimal::ZERO {
            return Err(EngineError::validation(
                "areaSqft",
                "must be a positive number",
            ));
        }
        if self.floors == 0 {
            return Err(EngineError::validation(
                "floors",
                "must be a positive integer",
            ));
        }
        if self.location.trim().is_empty() {
            return Err(EngineError::validation("location", "is required"));
        }
        Ok(())
    }
}

/// A brand and its location-adjusted unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandQuote {
    /// The brand name.
    pub brand: String,
    /// The unit price after the location multiplier is applied.
    pub unit_price: Decimal,
}

/// One priced material line in an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateLineItem {
    /// The material key (e.g. "cement").
    pub material: String,
    /// The unit the material is priced in (e.g. "bag").
    pub unit: String,
    /// The quantity required for the requested area.
    pub qty: Decimal,
    /// The chosen (cheapest) brand.
    pub brand: String,
    /// The chosen brand's location-adjusted unit price.
    pub unit_price: Decimal,
    /// `qty * unit_price`.
    pub subtotal: Decimal,
    /// Up to two cheaper-than-the-rest alternatives after the chosen
    /// minimum, sorted ascending by price.
    pub alternatives: Vec<BrandQuote>,
}

/// The priced bill of materials returned by the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    /// Per-material line items in fixed material enumeration order.
    pub items: Vec<EstimateLineItem>,
    /// Labour overhead: `materials_total * labor_pct`.
    pub labor_cost: Decimal,
    /// `materials_total + labor_cost`.
    pub total: Decimal,
    /// The shared currency, taken from the first material's catalog entry.
    pub currency: String,
    /// Human-readable cost-saving suggestions.
    pub suggestions: Vec<String>,
}

impl EstimateResult {
    /// Sum of the line-item subtotals.
    pub fn materials_total(&self) -> Decimal {
        self.items.iter().map(|item| item.subtotal).sum()
    }
}

/// A persisted estimate: the originating request and its result, stored
/// verbatim for later retrieval by owner id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEstimate {
    /// Generated document id.
    #[serde(default)]
    pub id: String,
    /// The owning user, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// When the estimate was saved.
    pub created_at: DateTime<Utc>,
    /// The request that produced the result.
    pub input: EstimateRequest,
    /// The computed result, stored unmodified.
    pub result: EstimateResult,
}
