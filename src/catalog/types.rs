//! Reference-data types for pricing and quality coefficients.
//!
//! Field names inside coefficient documents are snake_case
//! (`cement_bag_per_sqft`, `labor_pct`) because that is how the documents
//! are stored; the camelCase convention applies to the entity collections
//! only.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::QualityTier;

/// A price catalog entry for one material key (e.g. "cement").
///
/// Immutable reference data: created and updated only by the administrative
/// upsert endpoint, read by the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCatalogEntry {
    /// The unit the material is priced in (e.g. "bag", "kg").
    pub unit: String,
    /// The currency the base prices are quoted in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Location-name to price-multiplier mapping. A location absent from
    /// the map gets a multiplier of 1.0.
    #[serde(default)]
    pub locations: HashMap<String, Decimal>,
    /// Brand-name to base unit price mapping.
    #[serde(default)]
    pub brands: HashMap<String, Decimal>,
}

/// Per-material consumption rates per square foot, plus the labour
/// percentage overhead, for one quality tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityGrade {
    /// Cement bags per square foot.
    pub cement_bag_per_sqft: Decimal,
    /// Steel kilograms per square foot.
    pub steel_kg_per_sqft: Decimal,
    /// Sand cubic feet per square foot.
    pub sand_cft_per_sqft: Decimal,
    /// Bricks per square foot.
    pub bricks_per_sqft: Decimal,
    /// Paint litres per square foot.
    pub paint_ltr_per_sqft: Decimal,
    /// Labour overhead as a fraction of the materials total (e.g. 0.15).
    pub labor_pct: Decimal,
}

impl QualityGrade {
    /// The consumption rate per square foot for a material key.
    /// Unknown keys consume nothing.
    pub fn rate_per_sqft(&self, material: &str) -> Decimal {
        match material {
            "cement" => self.cement_bag_per_sqft,
            "steel" => self.steel_kg_per_sqft,
            "sand" => self.sand_cft_per_sqft,
            "bricks" => self.bricks_per_sqft,
            "paint" => self.paint_ltr_per_sqft,
            _ => Decimal::ZERO,
        }
    }
}

/// The quality coefficient document for one project type.
///
/// A tier may be absent from a document; the estimator surfaces that as a
/// validation failure on the `quality` field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoefficientSet {
    /// Coefficients for the economy tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economy: Option<QualityGrade>,
    /// Coefficients for the standard tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<QualityGrade>,
    /// Coefficients for the premium tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<QualityGrade>,
}

impl CoefficientSet {
    /// The grade for a quality tier, when the document carries it.
    pub fn grade(&self, tier: QualityTier) -> Option<&QualityGrade> {
        match tier {
            QualityTier::Economy => self.economy.as_ref(),
            QualityTier::Standard => self.standard.as_ref(),
            QualityTier::Premium => self.premium.as_ref(),
        }
    }
}
