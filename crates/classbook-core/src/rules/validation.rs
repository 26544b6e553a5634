use crate::errors::{ClassbookError, Result};
use crate::ops::Store;

use super::invariants;

/// Validate the whole store
///
/// Runs every invariant check and returns the first violation found:
///
/// 1. No identity-equal persons, no class name repeated among lessons and
///    no id repeated among persons
/// 2. Every embedded lesson copy is backed by the authoritative lesson
/// 3. Every lesson student holds a copy of that lesson
/// 4. Every embedded copy is value-equal to the authoritative lesson
/// 5. Every tutor id names an existing tutor, and tutors are never students
/// 6. Attendance only names enrolled students
///
/// # Errors
/// Returns `InvariantViolation` describing the first failure. For exhaustive
/// reporting, call the individual invariant functions directly.
pub fn validate_store(store: &Store) -> Result<()> {
    if let Some((first, duplicate)) = invariants::find_duplicate_persons(store).first() {
        return Err(violation(format!(
            "{} and {} are the same person",
            first, duplicate
        )));
    }

    if let Some((entity, key)) = invariants::find_duplicate_keys(store).first() {
        return Err(violation(format!("{} {} appears more than once", entity, key)));
    }

    if let Some((person_id, class_name)) = invariants::find_unbacked_lesson_copies(store).first() {
        return Err(violation(format!(
            "{} holds {} but is not among its students",
            person_id, class_name
        )));
    }

    if let Some((class_name, person_id)) = invariants::find_unreciprocated_students(store).first()
    {
        return Err(violation(format!(
            "{} lists {} but that person does not hold it",
            class_name, person_id
        )));
    }

    if let Some((person_id, class_name)) = invariants::find_stale_lesson_copies(store).first() {
        return Err(violation(format!(
            "{} holds a stale copy of {}",
            person_id, class_name
        )));
    }

    if let Some((class_name, tutor_id)) = invariants::find_invalid_tutors(store).first() {
        return Err(violation(format!(
            "{} names {} as tutor, which is not an existing tutor",
            class_name, tutor_id
        )));
    }

    if let Some(tutor_id) = invariants::find_tutors_as_students(store).first() {
        return Err(violation(format!(
            "tutor {} is enrolled as a student",
            tutor_id
        )));
    }

    if let Some((class_name, date, person_id)) =
        invariants::find_attendance_outside_enrolment(store).first()
    {
        return Err(violation(format!(
            "{} marks {} present on {} without enrolment",
            class_name, person_id, date
        )));
    }

    Ok(())
}

fn violation(reason: String) -> ClassbookError {
    ClassbookError::InvariantViolation { reason }
}
