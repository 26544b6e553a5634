//! Functional-boundary apply function
//!
//! `apply()` is the only way a resolved mutation reaches the store.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: the mutation runs against a store the caller handed
//!   over by value. On `Err` that working copy is dropped, and the caller's
//!   own copy, if it kept one, is exactly as it was.
//! - **No panics**: invalid input returns typed errors
//! - **Validated result**: every returned store has passed
//!   `validate_store`, so cascade repair is complete before anything commits
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use classbook_core::apply::apply;
//! use classbook_core::commands::Mutation;
//! use classbook_core::model::{PersonDetails, Role};
//! use classbook_core::Store;
//!
//! let mutation = Mutation::AddPerson(PersonDetails {
//!     name: "Alex Yeoh".to_string(),
//!     role: Role::Student,
//!     phone: "87438807".to_string(),
//!     email: "alexyeoh@example.com".to_string(),
//!     address: "Blk 30 Geylang Street 29".to_string(),
//!     tags: BTreeSet::new(),
//! });
//!
//! let (state, outcome) = apply(Store::new(), &mutation).unwrap();
//! assert_eq!(state.persons().len(), 1);
//! assert_eq!(outcome.feedback, "New person added: Alex Yeoh (S1)");
//! ```

use crate::commands::Mutation;
use crate::errors::Result;
use crate::history::ViewHint;
use crate::ops::{lesson_ops, person_ops, Store};
use crate::rules::validation;

/// What a successful mutation reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Message for the user
    pub feedback: String,
    /// Short label recorded in the snapshot log
    pub description: String,
    pub hint: ViewHint,
}

impl Outcome {
    fn new(feedback: String, description: String, hint: ViewHint) -> Self {
        Self {
            feedback,
            description,
            hint,
        }
    }
}

/// Apply a mutation to a store, returning the new store state
///
/// # Arguments
///
/// * `state` - Current store state (ownership transferred)
/// * `mutation` - Resolved change to make
///
/// # Errors
///
/// Returns whatever the underlying operation or cascade raises
/// (`ValidationFailed`, `DuplicateEntity`, `EntityNotFound`), or
/// `InvariantViolation` if the resulting store fails validation.
pub fn apply(mut state: Store, mutation: &Mutation) -> Result<(Store, Outcome)> {
    let hint = mutation.hint();
    let (feedback, description) = match mutation {
        Mutation::AddPerson(details) => {
            let person = person_ops::add_person(&mut state, details.clone())?;
            (
                format!("New person added: {} ({})", person.name, person.id),
                format!("add person {}", person.id),
            )
        }

        Mutation::EditPerson { target, edit } => {
            let person = person_ops::edit_person(&mut state, target, edit)?;
            (
                format!("Edited person: {} ({})", person.name, person.id),
                format!("edit person {}", person.id),
            )
        }

        Mutation::DeletePerson(target) => {
            person_ops::delete_person(&mut state, target)?;
            (
                format!("Deleted person: {} ({})", target.name, target.id),
                format!("delete person {}", target.id),
            )
        }

        Mutation::AddLesson(details) => {
            let lesson = lesson_ops::add_lesson(&mut state, details.clone())?;
            (
                format!(
                    "New lesson added: {} ({} {})",
                    lesson.class_name, lesson.day, lesson.time
                ),
                format!("add lesson {}", lesson.class_name),
            )
        }

        Mutation::EditLesson { target, edit } => {
            let lesson = lesson_ops::edit_lesson(&mut state, target, edit)?;
            (
                format!(
                    "Edited lesson: {} ({} {})",
                    lesson.class_name, lesson.day, lesson.time
                ),
                format!("edit lesson {}", target.class_name),
            )
        }

        Mutation::DeleteLesson(target) => {
            lesson_ops::delete_lesson(&mut state, target)?;
            (
                format!("Deleted lesson: {}", target.class_name),
                format!("delete lesson {}", target.class_name),
            )
        }

        Mutation::Enrol { student, lesson } => {
            lesson_ops::enrol(&mut state, student, lesson)?;
            (
                format!(
                    "Enrolled {} ({}) in {}",
                    student.name, student.id, lesson.class_name
                ),
                format!("enrol {} in {}", student.id, lesson.class_name),
            )
        }

        Mutation::Unenrol { student, lesson } => {
            lesson_ops::unenrol(&mut state, student, lesson)?;
            (
                format!(
                    "Unenrolled {} ({}) from {}",
                    student.name, student.id, lesson.class_name
                ),
                format!("unenrol {} from {}", student.id, lesson.class_name),
            )
        }

        Mutation::Mark {
            student,
            lesson,
            date,
        } => {
            lesson_ops::mark_attendance(&mut state, student, lesson, *date)?;
            (
                format!(
                    "Marked {} ({}) present for {} on {}",
                    student.name, student.id, lesson.class_name, date
                ),
                format!("mark {} for {} on {}", student.id, lesson.class_name, date),
            )
        }

        Mutation::Unmark {
            student,
            lesson,
            date,
        } => {
            lesson_ops::unmark_attendance(&mut state, student, lesson, *date)?;
            (
                format!(
                    "Unmarked {} ({}) for {} on {}",
                    student.name, student.id, lesson.class_name, date
                ),
                format!("unmark {} for {} on {}", student.id, lesson.class_name, date),
            )
        }

        Mutation::Clear => {
            lesson_ops::clear(&mut state);
            (
                "All persons and lessons have been cleared.".to_string(),
                "clear".to_string(),
            )
        }
    };

    validation::validate_store(&state)?;
    Ok((state, Outcome::new(feedback, description, hint)))
}
