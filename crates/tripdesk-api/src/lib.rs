//! Tripdesk API Library
//!
//! The back office HTTP service: media deletion reconciliation, admin
//! authorization, audit logging and application setup.

pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::MediaReconciler;
pub use state::AppState;
