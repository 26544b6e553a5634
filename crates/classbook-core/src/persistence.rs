//! Persistence collaborator seam
//!
//! The session hands the live store to a `Persistence` implementation after
//! every successfully executed command. Implementations live outside the core
//! (see `classbook-store`); the core only needs to tell the two failure kinds
//! apart.

use thiserror::Error;

use crate::ops::Store;

/// Why saving the store failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceFailure {
    #[error("Could not save data to {path}: permission denied. Check that the file is writable.")]
    PermissionDenied { path: String },

    #[error("Could not save data to {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Saves the current store after each successful command
pub trait Persistence {
    /// Persist `store`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` when the target cannot be written for
    /// access reasons, `Io` for every other failure.
    fn save(&mut self, store: &Store) -> Result<(), PersistenceFailure>;
}

/// Persistence that keeps nothing (in-memory sessions and tests)
///
/// # Example
/// ```
/// use classbook_core::persistence::{NoopPersistence, Persistence};
/// use classbook_core::Store;
///
/// let mut persistence = NoopPersistence;
/// assert!(persistence.save(&Store::new()).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPersistence;

impl Persistence for NoopPersistence {
    fn save(&mut self, _store: &Store) -> Result<(), PersistenceFailure> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DenyAll;

    impl Persistence for DenyAll {
        fn save(&mut self, _store: &Store) -> Result<(), PersistenceFailure> {
            Err(PersistenceFailure::PermissionDenied {
                path: "/readonly/classbook.json".to_string(),
            })
        }
    }

    #[test]
    fn test_trait_object_dispatch() {
        let mut sinks: Vec<Box<dyn Persistence>> =
            vec![Box::new(NoopPersistence), Box::new(DenyAll)];
        let store = Store::new();
        assert!(sinks[0].save(&store).is_ok());
        assert!(matches!(
            sinks[1].save(&store),
            Err(PersistenceFailure::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_messages_differ_by_kind() {
        let denied = PersistenceFailure::PermissionDenied {
            path: "a.json".to_string(),
        };
        let io = PersistenceFailure::Io {
            path: "a.json".to_string(),
            reason: "No space left on device".to_string(),
        };
        assert!(denied.to_string().contains("permission denied"));
        assert!(io.to_string().contains("No space left on device"));
    }
}
