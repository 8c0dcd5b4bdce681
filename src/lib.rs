//! Backend engine for a construction-project management application.
//!
//! This crate provides the material cost estimator, the labour attendance
//! reconciler, and the HTTP API that exposes them alongside project, labour,
//! material inventory, and user-profile bookkeeping. Documents live in an
//! injected [`store::DocumentStore`]; bearer tokens are verified by an
//! injected [`auth::IdentityProvider`].

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod estimation;
pub mod models;
pub mod store;
