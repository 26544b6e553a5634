//! Error handling for classbook-store
//!
//! Storage failures are reported as core `ExError`s so the session and the
//! logging macros can classify them without knowing about files.

use std::path::Path;

use classbook_core::errors::{ExError, ExErrorKind};
use classbook_core::PersistenceFailure;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error, keeping permission problems distinct
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    let kind = match err.kind() {
        std::io::ErrorKind::PermissionDenied => ExErrorKind::PermissionDenied,
        _ => ExErrorKind::Io,
    };
    ExError::new(kind)
        .with_op(operation)
        .with_entity_id(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a serialization error for a document that is not valid JSON
pub fn serialization_error(operation: &str, path: &Path, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation)
        .with_entity_id(path.display().to_string())
        .with_message(format!("Malformed data file: {}", err))
}

/// Create an error for a well-formed document the store cannot accept
pub fn invalid_data(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvariantViolation)
        .with_op("load")
        .with_entity_id(path.display().to_string())
        .with_message(reason)
}

/// Narrow a storage error to what the core persistence seam understands
pub fn to_persistence_failure(err: &ExError) -> PersistenceFailure {
    let path = err.entity_id().unwrap_or_default().to_string();
    match err.kind() {
        ExErrorKind::PermissionDenied => PersistenceFailure::PermissionDenied { path },
        _ => PersistenceFailure::Io {
            path,
            reason: err.message().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_permission_denied_keeps_its_kind() {
        let err = io_error(
            "save",
            Path::new("/readonly/classbook.json"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ExErrorKind::PermissionDenied);
        assert_eq!(
            to_persistence_failure(&err),
            PersistenceFailure::PermissionDenied {
                path: "/readonly/classbook.json".to_string()
            }
        );
    }

    #[test]
    fn test_other_io_errors_map_to_io() {
        let err = io_error(
            "save",
            Path::new("data/classbook.json"),
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(err.kind(), ExErrorKind::Io);
        match to_persistence_failure(&err) {
            PersistenceFailure::Io { path, reason } => {
                assert_eq!(path, "data/classbook.json");
                assert!(reason.contains("disk full"));
            }
            other => panic!("expected Io, got {:?}", other),
        }
    }
}
