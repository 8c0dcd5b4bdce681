//! HTTP API module for the construction-management backend.
//!
//! This module provides the REST endpoints: cost estimation, estimate
//! persistence, the price/coefficient catalog, labour and attendance,
//! material inventory, projects, and user registration/profile.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AddLabourRequest, AddMaterialRequest, AddMaterialToProjectRequest, AddProjectRequest,
    AttendanceRequest, EditMaterialInProjectRequest, EditProfileRequest, MarkStatusRequest,
    MaterialDraw, RegisterRequest, RosterUpdateRequest, SaveEstimateRequest,
    UpdateMaterialRequest, UpsertCoefficientsRequest, UpsertPricesRequest,
};
pub use response::ApiError;
pub use state::AppState;
