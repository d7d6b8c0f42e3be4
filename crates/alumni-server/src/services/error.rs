//! Service error types.

use alumni_cache::CacheError;

use crate::directory::DirectoryError;

/// Errors returned by the cache-backed services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The cache rejected the call or the directory failed while producing.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A direct directory call (a write) failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The request parameters are not acceptable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// Creates a new invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Returns the directory error behind this failure, if any.
    ///
    /// Looks through producer failures, where directory errors end up when a
    /// cold cache read hits an unavailable directory.
    pub fn directory_error(&self) -> Option<&DirectoryError> {
        match self {
            Self::Directory(err) => Some(err),
            Self::Cache(err) => err
                .producer_error()
                .and_then(|e| e.downcast_ref::<DirectoryError>()),
            Self::InvalidInput(_) => None,
        }
    }
}
