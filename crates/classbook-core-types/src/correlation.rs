//! Correlation types for request tracking
//!
//! A `RequestId` is minted for every command the session processes so that
//! the start, cascade and end events of one command can be grouped.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single processed command
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new time-ordered RequestId (UUIDv7)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one command's processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    /// Operation name the request was opened for (e.g. `"execute"`, `"respond"`)
    pub op: &'static str,
}

impl RequestContext {
    /// Create a new context with a fresh RequestId
    pub fn new(op: &'static str) -> Self {
        Self {
            request_id: RequestId::new(),
            op,
        }
    }
}
