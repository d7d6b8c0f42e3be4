//! Cache-backed services used by the HTTP handlers.
//!
//! Each service receives the shared [`CacheRegistry`] and the student
//! directory at construction time and owns the keys of its namespaces.

pub mod dashboard;
pub mod error;
pub mod students;
pub mod verification;

use std::collections::BTreeMap;
use std::time::Duration;

use alumni_cache::{CacheError, CacheRegistry, NamespaceConfig};
use tracing::warn;

pub use dashboard::{DashboardService, DashboardSummary};
pub use error::ServiceError;
pub use students::{StudentService, UpsertOutcome};
pub use verification::{Verification, VerificationService};

/// Certificate verification results, keyed by upper-cased student id.
pub const VERIFY: &str = "verify";
/// Student lookups, keyed by lower-cased email.
pub const STUDENTS: &str = "students";
/// Student listings, keyed by `page:{page}:{per_page}`.
pub const STUDENT_PAGES: &str = "student_pages";
/// Dashboard aggregates.
pub const DASHBOARD: &str = "dashboard";

/// Namespaces known to the services with their built-in configuration.
pub fn default_namespaces() -> BTreeMap<String, NamespaceConfig> {
    BTreeMap::from([
        (
            VERIFY.to_string(),
            NamespaceConfig::new(Duration::from_secs(10 * 60)).with_max_entries(5_000),
        ),
        (
            STUDENTS.to_string(),
            NamespaceConfig::new(Duration::from_secs(5 * 60)).with_max_entries(1_000),
        ),
        (
            STUDENT_PAGES.to_string(),
            NamespaceConfig::new(Duration::from_secs(2 * 60))
                .with_stale_window(Duration::from_secs(3 * 60))
                .with_max_entries(200),
        ),
        (
            DASHBOARD.to_string(),
            NamespaceConfig::new(Duration::from_secs(2 * 60))
                .with_stale_window(Duration::from_secs(5 * 60))
                .with_max_entries(16),
        ),
    ])
}

/// Registers the service namespaces in `cache`.
///
/// Namespaces missing from `configs` use [`default_namespaces`]; unknown
/// names are skipped with a warning since no service reads them.
pub fn register_namespaces(
    cache: &CacheRegistry,
    configs: &BTreeMap<String, NamespaceConfig>,
) -> Result<(), CacheError> {
    for name in configs.keys() {
        if !default_namespaces().contains_key(name) {
            warn!(namespace = %name, "Ignoring configuration for unknown cache namespace");
        }
    }

    let config_for = |name: &str| -> NamespaceConfig {
        configs
            .get(name)
            .copied()
            .or_else(|| default_namespaces().get(name).copied())
            .unwrap_or_default()
    };

    cache.register::<Verification>(VERIFY, config_for(VERIFY))?;
    cache.register::<Option<crate::directory::Student>>(STUDENTS, config_for(STUDENTS))?;
    cache.register::<crate::directory::Page<crate::directory::Student>>(
        STUDENT_PAGES,
        config_for(STUDENT_PAGES),
    )?;
    cache.register::<DashboardSummary>(DASHBOARD, config_for(DASHBOARD))?;
    Ok(())
}
