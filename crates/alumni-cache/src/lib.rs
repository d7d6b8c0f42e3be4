//! # Alumni Cache
//!
//! Namespaced in-memory cache with TTL expiry, stale-while-revalidate refresh
//! and bounded size, shared by the alumni platform's request handlers.
//!
//! ## Features
//!
//! - Per-namespace `ttl`, `stale_window` and `max_entries`
//! - Fresh hits without I/O, stale hits refreshed once in background
//! - Concurrent cold misses for a key share one producer call
//! - Oldest-first eviction, explicit and glob-pattern invalidation
//! - Periodic sweep of dead entries
//! - Read-only statistics and Prometheus-style metrics
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use alumni_cache::{CacheRegistry, NamespaceConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), alumni_cache::CacheError> {
//! let cache = CacheRegistry::new();
//! cache.register::<String>(
//!     "dashboard",
//!     NamespaceConfig::new(Duration::from_secs(120)).with_stale_window(Duration::from_secs(300)),
//! )?;
//!
//! let summary = cache
//!     .get("dashboard", "summary", || async { Ok("1250 graduates".to_string()) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod keys;
pub mod metrics;
pub mod namespace;
pub mod registry;
pub mod stats;
pub mod sweeper;

// Re-exports
pub use config::NamespaceConfig;
pub use entry::{CacheEntry, Freshness};
pub use error::CacheError;
pub use crate::metrics::{CacheMetrics, register_cache_metrics};
pub use namespace::{InvalidationResult, Namespace};
pub use registry::CacheRegistry;
pub use stats::CacheStats;
pub use sweeper::{SweepConfig, SweepHandle, SweepScheduler};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }
}
