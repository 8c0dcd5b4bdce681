//! Seed loading for reference data.
//!
//! Reference data ships as YAML files and is upserted into the document
//! store at startup, after which the administrative endpoints own it.
//!
//! # Directory Structure
//!
//! ```text
//! config/seed/
//! ├── prices.yaml        # material key -> PriceCatalogEntry
//! └── coefficients.yaml  # project type -> CoefficientSet
//! ```
//!
//! # Example
//!
//! ```no_run
//! use buildtrack::catalog::SeedCatalog;
//!
//! let seed = SeedCatalog::load("./config/seed").unwrap();
//! assert!(seed.prices.contains_key("cement"));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::store::{DocumentStore, collections};

use super::types::{CoefficientSet, PriceCatalogEntry};

/// Seed reference data parsed from YAML.
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    /// Price catalog entries keyed by material.
    pub prices: BTreeMap<String, PriceCatalogEntry>,
    /// Quality coefficients keyed by project type.
    pub coefficients: BTreeMap<String, CoefficientSet>,
}

impl SeedCatalog {
    /// Loads seed data from the given directory.
    ///
    /// Returns an error when either file is missing or fails to parse.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let prices = Self::load_yaml(&path.join("prices.yaml"))?;
        let coefficients = Self::load_yaml(&path.join("coefficients.yaml"))?;
        Ok(Self {
            prices,
            coefficients,
        })
    }

    /// Upserts the seed data into the store, merging over whatever the
    /// administrative endpoints may already have written.
    pub async fn apply(&self, store: &DocumentStore) -> EngineResult<()> {
        for (material, entry) in &self.prices {
            let doc = serde_json::to_value(entry).map_err(|e| EngineError::Storage {
                message: format!("failed to serialize price entry '{material}': {e}"),
            })?;
            store.set_merge(collections::PRICES, material, doc).await?;
        }
        for (project_type, set) in &self.coefficients {
            let doc = serde_json::to_value(set).map_err(|e| EngineError::Storage {
                message: format!("failed to serialize coefficients '{project_type}': {e}"),
            })?;
            store
                .set_merge(collections::COEFFICIENTS, project_type, doc)
                .await?;
        }
        Ok(())
    }

    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|_| EngineError::Storage {
            message: format!("seed file not found: {path_str}"),
        })?;
        serde_yaml::from_str(&content).map_err(|e| EngineError::Storage {
            message: format!("failed to parse seed file '{path_str}': {e}"),
        })
    }
}
