//! Material cost estimation.
//!
//! This module contains the cost estimator: brand ranking with location
//! price multipliers, per-material quantity computation from quality
//! coefficients, labour overhead, and the suggestion strings attached to
//! every estimate. The estimator only reads reference data; it has no side
//! effects.

mod estimator;
mod pricing;

pub use estimator::{DEFAULT_CURRENCY, MATERIAL_KEYS, estimate};
pub use pricing::{RankedBrands, rank_brands};
