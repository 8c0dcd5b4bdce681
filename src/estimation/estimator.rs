//! The cost estimator.

use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::{CoefficientSet, PriceCatalogEntry};
use crate::error::{EngineError, EngineResult};
use crate::models::{EstimateLineItem, EstimateRequest, EstimateResult};
use crate::store::{DocumentStore, collections};

use super::pricing::rank_brands;

/// The fixed material enumeration the estimator prices, in order.
///
/// The order matters twice: line items are emitted in this order, and the
/// first material's catalog currency becomes the estimate's currency.
pub const MATERIAL_KEYS: [&str; 5] = ["cement", "steel", "sand", "bricks", "paint"];

/// Currency used when the first material's catalog entry carries none.
pub const DEFAULT_CURRENCY: &str = "SAR";

// `Decimal`'s operators panic on overflow, and `areaSqft` is
// client-controlled, so every multiply/add in the estimate goes through
// these checked forms.
fn mul(a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(magnitude_overflow)
}

fn add(a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_add(b).ok_or_else(magnitude_overflow)
}

fn magnitude_overflow() -> EngineError {
    EngineError::Computation {
        message: "estimate exceeds the representable magnitude".to_string(),
    }
}

/// Computes a priced bill of materials for a project specification.
///
/// Validation happens before any store read. The algorithm then:
///
/// 1. fetches the quality coefficients for the project type,
/// 2. selects the grade for the requested tier,
/// 3. fetches all five price catalog entries (any gap fails the whole
///    request; no partial pricing),
/// 4. computes per-material quantities over `area_sqft * floors`,
/// 5. ranks brands per material by location-adjusted price and takes the
///    minimum, keeping up to two alternatives,
/// 6. sums subtotals and adds the labour percentage overhead.
///
/// The result satisfies `total == materials_total + materials_total *
/// labor_pct` exactly; `Decimal` arithmetic introduces no rounding here.
pub async fn estimate(
    store: &DocumentStore,
    request: &EstimateRequest,
) -> EngineResult<EstimateResult> {
    request.validate()?;

    let type_key = request.project_type.as_key();
    let coefficients = store
        .get(collections::COEFFICIENTS, type_key)
        .await?
        .ok_or_else(|| EngineError::not_found("coefficients", type_key))?;
    let coefficients: CoefficientSet =
        serde_json::from_value(coefficients).map_err(|e| EngineError::Storage {
            message: format!("malformed coefficient document '{type_key}': {e}"),
        })?;

    // A tier missing from the stored document is a data-integrity gap, but
    // it is surfaced like a client error on the quality field.
    let grade = coefficients.grade(request.quality).ok_or_else(|| {
        EngineError::validation(
            "quality",
            format!(
                "coefficients for '{}' have no '{}' tier",
                type_key,
                request.quality.as_key()
            ),
        )
    })?;

    let mut entries: Vec<(&str, PriceCatalogEntry)> = Vec::with_capacity(MATERIAL_KEYS.len());
    for material in MATERIAL_KEYS {
        let doc = store
            .get(collections::PRICES, material)
            .await?
            .ok_or_else(|| EngineError::not_found("price", material))?;
        let entry: PriceCatalogEntry =
            serde_json::from_value(doc).map_err(|e| EngineError::Storage {
                message: format!("malformed price document '{material}': {e}"),
            })?;
        entries.push((material, entry));
    }

    // All prices are assumed to share one currency; the first material in
    // the fixed enumeration order wins.
    let currency = entries[0]
        .1
        .currency
        .clone()
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let area_total = mul(request.area_sqft, Decimal::from(request.floors))?;
    debug!(%area_total, project_type = type_key, "computing estimate");

    let mut items = Vec::with_capacity(entries.len());
    let mut materials_total = Decimal::ZERO;
    for (material, entry) in &entries {
        let ranked = rank_brands(material, entry, &request.location)?;
        let qty = mul(grade.rate_per_sqft(material), area_total)?;
        let subtotal = mul(qty, ranked.chosen.unit_price)?;
        materials_total = add(materials_total, subtotal)?;
        items.push(EstimateLineItem {
            material: material.to_string(),
            unit: entry.unit.clone(),
            qty,
            brand: ranked.chosen.brand,
            unit_price: ranked.chosen.unit_price,
            subtotal,
            alternatives: ranked.alternatives,
        });
    }

    let labor_cost = mul(materials_total, grade.labor_pct)?;
    let total = add(materials_total, labor_cost)?;

    let suggestions = vec![
        format!(
            "Bulk purchase popular materials near {} to reduce logistics cost.",
            request.location
        ),
        format!(
            "Current quality: {}. Consider mixing premium paint only for exterior.",
            request.quality.as_key()
        ),
    ];

    Ok(EstimateResult {
        items,
        labor_cost,
        total,
        currency,
        suggestions,
    })
}
