use chrono::NaiveDate;
use tracing::debug;

use super::{cascade, store::Store};
use crate::errors::{ClassbookError, Result};
use crate::model::{Lesson, LessonDetails, LessonEdit, Person, PersonId};

/// Add a new lesson with no students
///
/// # Errors
/// * `ValidationFailed` - If the class name is blank or the tutor id does not
///   name an existing tutor
/// * `DuplicateEntity` - If a lesson with the same class name exists
pub fn add_lesson(store: &mut Store, details: LessonDetails) -> Result<Lesson> {
    ensure_class_name(&details.class_name)?;
    ensure_tutor(store, &details.tutor_id)?;

    let lesson = Lesson::new(details);
    store.add_lesson(lesson.clone())?;

    debug!(class_name = %lesson.class_name, tutor_id = %lesson.tutor_id, "lesson added");
    Ok(lesson)
}

/// Apply `edit` to `target` and refresh every embedded copy
///
/// Enrolment and attendance carry over unchanged, including across a rename.
///
/// # Errors
/// * `ValidationFailed` - If nothing would change, the new class name is blank
///   or the new tutor id does not name an existing tutor
/// * `EntityNotFound` - If `target` is not in the store
/// * `DuplicateEntity` - If the new class name is taken by another lesson
pub fn edit_lesson(store: &mut Store, target: &Lesson, edit: &LessonEdit) -> Result<Lesson> {
    if edit.is_empty() {
        return Err(ClassbookError::validation(
            "At least one field to edit must be provided",
        ));
    }
    if let Some(class_name) = &edit.class_name {
        ensure_class_name(class_name)?;
    }
    if let Some(tutor_id) = &edit.tutor_id {
        ensure_tutor(store, tutor_id)?;
    }

    let edited = target.with_edit(edit);
    cascade::replace_lesson(store, target, &edited)?;

    debug!(
        old_class_name = %target.class_name,
        class_name = %edited.class_name,
        "lesson edited"
    );
    Ok(edited)
}

/// Delete `target` and strip it from every person
///
/// # Errors
/// * `EntityNotFound` - If `target` is not in the store
pub fn delete_lesson(store: &mut Store, target: &Lesson) -> Result<()> {
    store.remove_lesson(target)?;
    let repaired = cascade::on_lesson_deleted(store, target)?;

    debug!(class_name = %target.class_name, persons_repaired = repaired, "lesson deleted");
    Ok(())
}

/// Enrol `student` in `lesson`
///
/// # Errors
/// * `ValidationFailed` - If `student` is a tutor or is already enrolled
/// * `EntityNotFound` - If either side is not in the store
pub fn enrol(store: &mut Store, student: &Person, lesson: &Lesson) -> Result<Lesson> {
    if !student.is_student() {
        return Err(ClassbookError::validation(format!(
            "{} ({}) is a tutor; only students can be enrolled",
            student.name, student.id
        )));
    }
    if lesson.has_student(&student.id) {
        return Err(ClassbookError::validation(format!(
            "{} ({}) is already enrolled in {}",
            student.name, student.id, lesson.class_name
        )));
    }

    let updated = cascade::enrol(store, &student.id, lesson)?;
    debug!(person_id = %student.id, class_name = %lesson.class_name, "student enrolled");
    Ok(updated)
}

/// Remove `student` from `lesson`, dropping their attendance marks with it
///
/// # Errors
/// * `ValidationFailed` - If `student` is not enrolled in `lesson`
/// * `EntityNotFound` - If either side is not in the store
pub fn unenrol(store: &mut Store, student: &Person, lesson: &Lesson) -> Result<Lesson> {
    ensure_enrolled(student, lesson)?;

    let updated = cascade::unenrol(store, &student.id, lesson)?;
    debug!(person_id = %student.id, class_name = %lesson.class_name, "student unenrolled");
    Ok(updated)
}

/// Mark `student` present at `lesson` on `date`
///
/// # Errors
/// * `ValidationFailed` - If `student` is not enrolled, or is already marked
///   present on that date
/// * `EntityNotFound` - If `lesson` is not in the store
pub fn mark_attendance(
    store: &mut Store,
    student: &Person,
    lesson: &Lesson,
    date: NaiveDate,
) -> Result<Lesson> {
    ensure_enrolled(student, lesson)?;
    if lesson.is_present(&student.id, date) {
        return Err(ClassbookError::validation(format!(
            "{} ({}) is already marked present for {} on {}",
            student.name, student.id, lesson.class_name, date
        )));
    }

    let updated = lesson.with_attendance(student.id.clone(), date);
    cascade::replace_lesson(store, lesson, &updated)?;
    Ok(updated)
}

/// Withdraw a previous attendance mark
///
/// # Errors
/// * `ValidationFailed` - If `student` was not marked present on `date`
/// * `EntityNotFound` - If `lesson` is not in the store
pub fn unmark_attendance(
    store: &mut Store,
    student: &Person,
    lesson: &Lesson,
    date: NaiveDate,
) -> Result<Lesson> {
    if !lesson.is_present(&student.id, date) {
        return Err(ClassbookError::validation(format!(
            "{} ({}) was not marked present for {} on {}",
            student.name, student.id, lesson.class_name, date
        )));
    }

    let updated = lesson.without_attendance(&student.id, date);
    cascade::replace_lesson(store, lesson, &updated)?;
    Ok(updated)
}

/// Drop every person and lesson
pub fn clear(store: &mut Store) {
    let persons = store.persons().len();
    let lessons = store.lessons().len();
    store.clear();
    debug!(persons, lessons, "store cleared");
}

fn ensure_class_name(class_name: &str) -> Result<()> {
    if class_name.trim().is_empty() {
        return Err(ClassbookError::validation(
            "Class name cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

fn ensure_tutor(store: &Store, tutor_id: &PersonId) -> Result<()> {
    match store.person_by_id(tutor_id) {
        Some(p) if p.is_tutor() => Ok(()),
        Some(p) => Err(ClassbookError::validation(format!(
            "{} ({}) is not a tutor",
            p.name, p.id
        ))),
        None => Err(ClassbookError::validation(format!(
            "No tutor with id {}",
            tutor_id
        ))),
    }
}

fn ensure_enrolled(student: &Person, lesson: &Lesson) -> Result<()> {
    if !lesson.has_student(&student.id) {
        return Err(ClassbookError::validation(format!(
            "{} ({}) is not enrolled in {}",
            student.name, student.id, lesson.class_name
        )));
    }
    Ok(())
}
