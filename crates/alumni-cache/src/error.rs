//! Error types for the cache.

use std::sync::Arc;

/// Errors returned by cache operations.
///
/// Misses, evictions and expiries are normal control flow and never show up
/// here.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The namespace was never registered.
    #[error("namespace not found: {0}")]
    NamespaceNotFound(String),

    /// A namespace with the same name is already registered.
    #[error("namespace already registered: {0}")]
    NamespaceExists(String),

    /// The namespace exists but stores a different value type.
    #[error("namespace '{namespace}' does not store values of type {expected}")]
    TypeMismatch {
        namespace: String,
        expected: &'static str,
    },

    /// A namespace or sweep configuration is not usable.
    #[error("invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// Keys must not be empty.
    #[error("cache key cannot be empty")]
    EmptyKey,

    /// The producer supplied by the caller failed.
    #[error("producer failed: {0}")]
    Producer(Arc<anyhow::Error>),
}

impl CacheError {
    /// Wraps a producer failure.
    pub fn producer(err: anyhow::Error) -> Self {
        Self::Producer(Arc::new(err))
    }

    /// Returns the original producer error, if this is a producer failure.
    ///
    /// Callers can `downcast_ref` the result to recover their own error type.
    pub fn producer_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Producer(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
