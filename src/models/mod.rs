//! Core data models for the construction-management backend.
//!
//! This module contains all the domain models used throughout the engine.
//! Wire field names are camelCase to match the documents the store holds
//! and the JSON the API speaks.

mod estimate;
mod labour;
mod material;
mod project;
mod user;

pub use estimate::{
    BrandQuote, EstimateLineItem, EstimateRequest, EstimateResult, ProjectType, QualityTier,
    SavedEstimate,
};
pub use labour::{AttendanceEntry, AttendanceEvent, Labour};
pub use material::Material;
pub use project::{MaterialUsage, Project, ProjectLabour};
pub use user::{DEFAULT_PICTURE, UserProfile};
