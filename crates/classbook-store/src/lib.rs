//! Classbook Store - JSON file persistence for the classbook
//!
//! Provides:
//! - `JsonFileStorage`, the file-backed `Persistence` implementation
//! - The versioned on-disk `StoreDocument`
//! - Atomic temp-then-rename writes

pub mod atomic;
pub mod errors;
pub mod format;
pub mod json_storage;

pub use errors::Result;
pub use format::{StoreDocument, FORMAT_VERSION};
pub use json_storage::JsonFileStorage;
