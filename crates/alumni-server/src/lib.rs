//! # Alumni Server
//!
//! HTTP service for the alumni platform. Student lookups, certificate
//! verification and dashboard aggregates read through one shared
//! [`alumni_cache::CacheRegistry`]; admin endpoints expose its statistics and
//! invalidation.

pub mod directory;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod services;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use server::{create_router, create_router_with_metrics, run_server};
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
