use classbook_core_types::RequestId;
use thiserror::Error;

use crate::persistence::PersistenceFailure;

/// Result type alias using ClassbookError
pub type Result<T> = std::result::Result<T, ClassbookError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code that logs, tests and any outer surface can
/// match on without depending on message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Store
    AlreadyExists,
    NotFound,
    InvariantViolation,

    // Command validation
    InvalidInput,

    // Confirmation gate
    InvalidResponse,
    NothingPending,
    ConfirmationPending,

    // Snapshot log
    NoPreviousState,
    NoNextState,

    // Persistence
    PermissionDenied,
    Io,
    Serialization,

    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidResponse => "ERR_INVALID_RESPONSE",
            ExErrorKind::NothingPending => "ERR_NOTHING_PENDING",
            ExErrorKind::ConfirmationPending => "ERR_CONFIRMATION_PENDING",
            ExErrorKind::NoPreviousState => "ERR_NO_PREVIOUS_STATE",
            ExErrorKind::NoNextState => "ERR_NO_NEXT_STATE",
            ExErrorKind::PermissionDenied => "ERR_PERMISSION_DENIED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever context was known where the
/// error was observed. Built from a `ClassbookError` (or directly by the
/// storage crate) and consumed by the logging macros.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (a person id or a class name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// The two record collections, for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Lesson,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Person => write!(f, "person"),
            EntityKind::Lesson => write!(f, "lesson"),
        }
    }
}

/// Error taxonomy for classbook operations
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassbookError {
    // ===== Store =====
    /// An identity-equal entity is already present
    #[error("This {entity} already exists: {key}")]
    DuplicateEntity { entity: EntityKind, key: String },

    /// No identity-equal entity is present
    #[error("No such {entity}: {key}")]
    EntityNotFound { entity: EntityKind, key: String },

    /// A store failed a consistency check
    #[error("Store invariant violated: {reason}")]
    InvariantViolation { reason: String },

    // ===== Command =====
    /// Command could not be resolved or is not allowed in the current state
    #[error("{reason}")]
    ValidationFailed { reason: String },

    // ===== Confirmation gate =====
    /// Reply to a pending command was neither `y` nor `n`
    #[error("Invalid response '{response}'. Please reply with 'y' or 'n'.")]
    InvalidConfirmationResponse { response: String },

    /// Reply arrived while nothing was pending
    #[error("There is no pending action to confirm.")]
    NoPendingCommand,

    /// A new command arrived while another is waiting for a reply
    #[error("An action is awaiting confirmation. Please reply with 'y' or 'n' first.")]
    AwaitingConfirmation,

    // ===== Snapshot log =====
    #[error("There is no command to undo.")]
    NoPreviousState,

    #[error("There is no command to redo.")]
    NoNextState,

    // ===== Persistence =====
    /// Saving failed after the in-memory state had already advanced
    #[error(transparent)]
    PersistenceFailed(#[from] PersistenceFailure),
}

impl ClassbookError {
    /// Shorthand for `ValidationFailed`
    pub fn validation(reason: impl Into<String>) -> Self {
        ClassbookError::ValidationFailed {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ExErrorKind {
        match self {
            ClassbookError::DuplicateEntity { .. } => ExErrorKind::AlreadyExists,
            ClassbookError::EntityNotFound { .. } => ExErrorKind::NotFound,
            ClassbookError::InvariantViolation { .. } => ExErrorKind::InvariantViolation,
            ClassbookError::ValidationFailed { .. } => ExErrorKind::InvalidInput,
            ClassbookError::InvalidConfirmationResponse { .. } => ExErrorKind::InvalidResponse,
            ClassbookError::NoPendingCommand => ExErrorKind::NothingPending,
            ClassbookError::AwaitingConfirmation => ExErrorKind::ConfirmationPending,
            ClassbookError::NoPreviousState => ExErrorKind::NoPreviousState,
            ClassbookError::NoNextState => ExErrorKind::NoNextState,
            ClassbookError::PersistenceFailed(PersistenceFailure::PermissionDenied { .. }) => {
                ExErrorKind::PermissionDenied
            }
            ClassbookError::PersistenceFailed(PersistenceFailure::Io { .. }) => ExErrorKind::Io,
        }
    }
}

impl From<ClassbookError> for ExError {
    fn from(err: ClassbookError) -> Self {
        let ex = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            ClassbookError::DuplicateEntity { key, .. }
            | ClassbookError::EntityNotFound { key, .. } => ex.with_entity_id(key),
            _ => ex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_map_to_codes() {
        let err = ClassbookError::EntityNotFound {
            entity: EntityKind::Lesson,
            key: "A1a".to_string(),
        };
        assert_eq!(err.kind().code(), "ERR_NOT_FOUND");
        assert_eq!(ClassbookError::NoNextState.kind().code(), "ERR_NO_NEXT_STATE");
    }

    #[test]
    fn test_persistence_failures_have_distinct_kinds() {
        let denied = ClassbookError::from(PersistenceFailure::PermissionDenied {
            path: "data/classbook.json".to_string(),
        });
        let io = ClassbookError::from(PersistenceFailure::Io {
            path: "data/classbook.json".to_string(),
            reason: "disk full".to_string(),
        });
        assert_eq!(denied.kind(), ExErrorKind::PermissionDenied);
        assert_eq!(io.kind(), ExErrorKind::Io);
        assert_ne!(denied.to_string(), io.to_string());
    }

    #[test]
    fn test_ex_error_carries_entity_context() {
        let err = ClassbookError::DuplicateEntity {
            entity: EntityKind::Person,
            key: "S1".to_string(),
        };
        let ex: ExError = err.into();
        assert_eq!(ex.code(), "ERR_ALREADY_EXISTS");
        assert_eq!(ex.entity_id(), Some("S1"));
        assert!(ex.to_string().contains("[ERR_ALREADY_EXISTS]"));
    }

    #[test]
    fn test_ex_error_builder() {
        let source = ExError::new(ExErrorKind::Io).with_message("disk full");
        let ex = ExError::new(ExErrorKind::Internal)
            .with_op("save")
            .with_message("wrapped")
            .with_source(source);
        assert_eq!(ex.op(), Some("save"));
        assert_eq!(ex.source_error().map(|s| s.kind()), Some(ExErrorKind::Io));
        assert!(std::error::Error::source(&ex).is_some());
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            ClassbookError::NoPendingCommand.to_string(),
            "There is no pending action to confirm."
        );
        assert_eq!(
            ClassbookError::validation("The person index provided is invalid").to_string(),
            "The person index provided is invalid"
        );
    }
}
