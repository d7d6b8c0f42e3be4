//! Error types for student directories.

use std::path::PathBuf;

/// Errors that can occur when reading or writing the student directory.
///
/// A missing student is not an error: lookups return `Ok(None)` so that
/// callers can cache negative results.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The directory is not reachable.
    #[error("directory unavailable: {reason}")]
    Unavailable { reason: String },

    /// An I/O error occurred while loading seed data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed data could not be parsed.
    #[error("parse error in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A record failed validation.
    #[error("invalid student record: {0}")]
    InvalidRecord(String),
}

impl DirectoryError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DirectoryError::unavailable("connection refused");
        assert_eq!(err.to_string(), "directory unavailable: connection refused");

        let err = DirectoryError::parse("/data/students.yml", "invalid YAML");
        assert_eq!(
            err.to_string(),
            "parse error in /data/students.yml: invalid YAML"
        );

        let err = DirectoryError::InvalidRecord("email is required".to_string());
        assert_eq!(err.to_string(), "invalid student record: email is required");
    }

    #[test]
    fn test_is_transient() {
        assert!(DirectoryError::unavailable("timeout").is_transient());
        assert!(!DirectoryError::InvalidRecord("x".to_string()).is_transient());
    }
}
