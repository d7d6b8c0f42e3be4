//! Application state.

use std::sync::Arc;

use alumni_cache::CacheRegistry;

use crate::directory::StudentDirectory;
use crate::services::{
    DashboardService, ServiceError, StudentService, VerificationService, default_namespaces,
    register_namespaces,
};

/// Application state shared across all handlers.
///
/// Holds the one cache registry of the process; every service reads through
/// it, and the admin endpoints inspect it.
#[derive(Clone)]
pub struct AppState {
    cache: CacheRegistry,
    directory: Arc<dyn StudentDirectory>,
    verification: VerificationService,
    students: StudentService,
    dashboard: DashboardService,
}

impl AppState {
    /// Creates the state from a registry whose service namespaces are
    /// already registered.
    pub fn new(
        cache: CacheRegistry,
        directory: Arc<dyn StudentDirectory>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            verification: VerificationService::new(&cache, Arc::clone(&directory))?,
            students: StudentService::new(&cache, Arc::clone(&directory))?,
            dashboard: DashboardService::new(&cache, Arc::clone(&directory))?,
            cache,
            directory,
        })
    }

    /// Creates the state with a fresh registry using the default namespaces.
    pub fn with_defaults(directory: Arc<dyn StudentDirectory>) -> Result<Self, ServiceError> {
        let cache = CacheRegistry::new();
        register_namespaces(&cache, &default_namespaces())?;
        Self::new(cache, directory)
    }

    /// Returns the cache registry.
    pub fn cache(&self) -> &CacheRegistry {
        &self.cache
    }

    /// Returns the student directory.
    pub fn directory(&self) -> &dyn StudentDirectory {
        self.directory.as_ref()
    }

    pub fn verification(&self) -> &VerificationService {
        &self.verification
    }

    pub fn students(&self) -> &StudentService {
        &self.students
    }

    pub fn dashboard(&self) -> &DashboardService {
        &self.dashboard
    }
}
