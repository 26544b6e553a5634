//! Core types shared by the classbook crates
//!
//! - **Correlation types**: `RequestId`, `RequestContext` for tying together
//!   the log events emitted while one command is processed
//! - **Sensitive data**: `Sensitive<T>` marker for redacting contact details
//! - **Schema constants**: canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId};
pub use sensitive::Sensitive;
