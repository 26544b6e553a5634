//! Classbook Core - in-memory roster of persons and lessons
//!
//! This crate provides:
//! - Person and Lesson models with denormalized cross-references
//! - An invariant-checked record store and the cascade repairs that keep
//!   both sides of every enrolment consistent
//! - A confirmation gate for irreversible commands
//! - A snapshot log with undo/redo over the whole store
//! - `Session`, which runs commands through all of the above
//!
//! Parsing, on-disk storage and the command line live in the outer crates.

pub mod apply;
pub mod commands;
pub mod errors;
pub mod gate;
pub mod history;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod persistence;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use apply::apply;
pub use commands::{Command, ConfirmableAction, ConfirmableCommand, DirectCommand, PersonRef};
pub use errors::{ClassbookError, ExError, ExErrorKind, Result};
pub use history::{History, ViewHint};
pub use model::{Lesson, Person, PersonId, Role};
pub use ops::Store;
pub use persistence::{NoopPersistence, Persistence, PersistenceFailure};
pub use session::{CommandResult, Session};
