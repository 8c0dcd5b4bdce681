//! Reference data for the cost estimator.
//!
//! This module defines the strongly-typed shapes of the two reference
//! collections (per-material price catalog entries and per-project-type
//! quality coefficients) and a YAML seed loader that upserts them into the
//! document store at startup. Reference data is read-only to request
//! traffic; only the administrative upsert endpoints mutate it.

mod seed;
mod types;

pub use seed::SeedCatalog;
pub use types::{CoefficientSet, PriceCatalogEntry, QualityGrade};
