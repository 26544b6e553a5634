//! Canonical schema constants for structured logging
//!
//! Every lifecycle event carries `component`, `op` and `event`; the remaining
//! keys are attached where the operation has them.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_PERSON_ID: &str = "person_id";
pub const FIELD_CLASS_NAME: &str = "class_name";

// Snapshot log
pub const FIELD_CURSOR: &str = "cursor";
pub const FIELD_SNAPSHOT_COUNT: &str = "snapshot_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
