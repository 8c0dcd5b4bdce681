//! Brand ranking with location price multipliers.

use rust_decimal::Decimal;

use crate::catalog::PriceCatalogEntry;
use crate::error::{EngineError, EngineResult};
use crate::models::BrandQuote;

/// The outcome of ranking a material's brands for a location.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBrands {
    /// The cheapest brand after location adjustment.
    pub chosen: BrandQuote,
    /// Up to two further brands, ascending by adjusted price.
    pub alternatives: Vec<BrandQuote>,
}

/// Ranks a material's brands by location-adjusted unit price.
///
/// Every brand's base price is multiplied by the location multiplier
/// (1.0 when the location is absent from the entry's map), then sorted
/// ascending; ties break on brand name so the ranking is deterministic.
/// The minimum is the chosen brand; positions 1 and 2 become the
/// alternatives. A material with zero registered brands is a computation
/// error.
///
/// # Example
///
/// ```
/// use buildtrack::catalog::PriceCatalogEntry;
/// use buildtrack::estimation::rank_brands;
/// use rust_decimal::Decimal;
/// use std::collections::HashMap;
///
/// let entry = PriceCatalogEntry {
///     unit: "bag".to_string(),
///     currency: Some("SAR".to_string()),
///     locations: HashMap::from([("Jeddah".to_string(), Decimal::new(105, 2))]),
///     brands: HashMap::from([
///         ("Falcon".to_string(), Decimal::from(300)),
///         ("Summit".to_string(), Decimal::from(320)),
///     ]),
/// };
///
/// let ranked = rank_brands("cement", &entry, "Jeddah").unwrap();
/// assert_eq!(ranked.chosen.brand, "Falcon");
/// assert_eq!(ranked.chosen.unit_price, Decimal::from(315)); // 300 * 1.05
/// ```
pub fn rank_brands(
    material: &str,
    entry: &PriceCatalogEntry,
    location: &str,
) -> EngineResult<RankedBrands> {
    let multiplier = entry
        .locations
        .get(location)
        .copied()
        .unwrap_or(Decimal::ONE);

    let mut quotes: Vec<BrandQuote> = entry
        .brands
        .iter()
        .map(|(brand, price)| BrandQuote {
            brand: brand.clone(),
            unit_price: *price * multiplier,
        })
        .collect();
    quotes.sort_by(|a, b| {
        a.unit_price
            .cmp(&b.unit_price)
            .then_with(|| a.brand.cmp(&b.brand))
    });

    let mut quotes = quotes.into_iter();
    let chosen = quotes.next().ok_or_else(|| EngineError::Computation {
        message: format!("no brands available for {material}"),
    })?;
    let alternatives = quotes.take(2).collect();

    Ok(RankedBrands {
        chosen,
        alternatives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(brands: &[(&str, &str)], locations: &[(&str, &str)]) -> PriceCatalogEntry {
        PriceCatalogEntry {
            unit: "bag".to_string(),
            currency: Some("SAR".to_string()),
            locations: locations
                .iter()
                .map(|(k, v)| (k.to_string(), dec(v)))
                .collect(),
            brands: brands
                .iter()
                .map(|(k, v)| (k.to_string(), dec(v)))
                .collect(),
        }
    }

    #[test]
    fn test_chooses_cheapest_brand() {
        let entry = entry(
            &[("Falcon", "300"), ("Summit", "320"), ("Apex", "310")],
            &[],
        );
        let ranked = rank_brands("cement", &entry, "Riyadh").unwrap();
        assert_eq!(ranked.chosen.brand, "Falcon");
        assert_eq!(ranked.chosen.unit_price, dec("300"));
    }

    #[test]
    fn test_alternatives_are_positions_one_and_two() {
        let entry = entry(
            &[
                ("Falcon", "300"),
                ("Apex", "310"),
                ("Summit", "320"),
                ("Crown", "340"),
            ],
            &[],
        );
        let ranked = rank_brands("cement", &entry, "Riyadh").unwrap();
        assert_eq!(ranked.alternatives.len(), 2);
        assert_eq!(ranked.alternatives[0].brand, "Apex");
        assert_eq!(ranked.alternatives[1].brand, "Summit");
    }

    #[test]
    fn test_multiplier_applies_to_every_brand() {
        let entry = entry(
            &[("Falcon", "300"), ("Summit", "320")],
            &[("Jeddah", "1.05")],
        );
        let ranked = rank_brands("cement", &entry, "Jeddah").unwrap();
        assert_eq!(ranked.chosen.unit_price, dec("315.00"));
        assert_eq!(ranked.alternatives[0].unit_price, dec("336.00"));
    }

    #[test]
    fn test_unknown_location_defaults_to_unit_multiplier() {
        let entry = entry(&[("Falcon", "300")], &[("Jeddah", "1.05")]);
        let ranked = rank_brands("cement", &entry, "Nowhere").unwrap();
        assert_eq!(ranked.chosen.unit_price, dec("300"));
    }

    #[test]
    fn test_multiplier_can_reorder_nothing_but_scales_all() {
        // Multipliers are per-material, not per-brand, so ordering is stable.
        let entry = entry(
            &[("Falcon", "300"), ("Summit", "320")],
            &[("Dammam", "0.98")],
        );
        let ranked = rank_brands("cement", &entry, "Dammam").unwrap();
        assert_eq!(ranked.chosen.brand, "Falcon");
        assert_eq!(ranked.chosen.unit_price, dec("294.00"));
    }

    #[test]
    fn test_zero_brands_is_computation_error() {
        let entry = entry(&[], &[]);
        let err = rank_brands("cement", &entry, "Riyadh").unwrap_err();
        assert!(matches!(err, EngineError::Computation { .. }));
        assert!(err.to_string().contains("cement"));
    }

    #[test]
    fn test_single_brand_has_no_alternatives() {
        let entry = entry(&[("Falcon", "300")], &[]);
        let ranked = rank_brands("cement", &entry, "Riyadh").unwrap();
        assert!(ranked.alternatives.is_empty());
    }

    #[test]
    fn test_price_tie_breaks_on_brand_name() {
        let entry = entry(&[("Beta", "300"), ("Alpha", "300")], &[]);
        let ranked = rank_brands("cement", &entry, "Riyadh").unwrap();
        assert_eq!(ranked.chosen.brand, "Alpha");
        assert_eq!(ranked.alternatives[0].brand, "Beta");
    }
}
