//! Error types for the desktop-integration engine.
//!
//! Unsupported OS/access-point combinations are deliberately *not* errors:
//! the dispatcher treats them as silent no-ops so one access point list can
//! be applied unchanged across heterogeneous machines.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for desktop-integration operations.
#[derive(Debug, Error)]
pub enum IntegrationError {
    // Capability resolution errors
    #[error("No capability with ID '{id}' (kind: {kind}) in any compatible capability list")]
    CapabilityNotFound { kind: &'static str, id: String },

    #[error("Capability '{id}' exists but is a {found} capability, not {expected}")]
    CapabilityTypeMismatch {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    // Conflict detection errors
    #[error("Access point {new_access_point} of {new_app} conflicts with {existing_access_point} owned by {existing_app} over '{conflict_id}'")]
    ConflictDetected {
        /// The clashing identifier in the global conflict namespace.
        conflict_id: String,
        /// The application already holding the identifier.
        existing_app: String,
        existing_access_point: String,
        new_app: String,
        new_access_point: String,
    },

    // Platform collaborator errors
    #[error("Platform operation '{operation}' failed: {message}")]
    Platform {
        operation: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Registry/app-list errors
    #[error("Application not registered: {uri}")]
    AppNotFound { uri: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Operation was cancelled")]
    Cancelled,
}

/// Result type alias for desktop-integration operations.
pub type Result<T> = std::result::Result<T, IntegrationError>;

impl From<std::io::Error> for IntegrationError {
    fn from(err: std::io::Error) -> Self {
        IntegrationError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl IntegrationError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        IntegrationError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a platform-operation error without an underlying source.
    pub fn platform(operation: impl Into<String>, message: impl Into<String>) -> Self {
        IntegrationError::Platform {
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error indicates a broken capability reference.
    ///
    /// Both variants carry the same severity: the whole apply/unapply for
    /// the offending access point is aborted.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            IntegrationError::CapabilityNotFound { .. }
                | IntegrationError::CapabilityTypeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IntegrationError::CapabilityNotFound {
            kind: "file-type",
            id: "text/plain".into(),
        };
        assert_eq!(
            err.to_string(),
            "No capability with ID 'text/plain' (kind: file-type) in any compatible capability list"
        );
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = IntegrationError::CapabilityTypeMismatch {
            id: "http".into(),
            expected: "file-type",
            found: "url-protocol",
        };
        assert_eq!(
            err.to_string(),
            "Capability 'http' exists but is a url-protocol capability, not file-type"
        );
    }

    #[test]
    fn test_resolution_failure_classification() {
        assert!(IntegrationError::CapabilityNotFound {
            kind: "auto-play",
            id: "ap1".into()
        }
        .is_resolution_failure());
        assert!(!IntegrationError::Cancelled.is_resolution_failure());
    }

    #[test]
    fn test_io_with_path() {
        let err = IntegrationError::io_with_path(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            "/tmp/x",
        );
        match err {
            IntegrationError::Io { path, .. } => assert_eq!(path, Some(PathBuf::from("/tmp/x"))),
            other => panic!("unexpected error: {other}"),
        }
    }
}
