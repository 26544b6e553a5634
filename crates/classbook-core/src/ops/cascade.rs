//! Cascade consistency engine
//!
//! Persons embed full lesson copies and lessons embed student ids. Every edit
//! or delete on one side leaves the other side stale; the functions here walk
//! the other collection and swap every stale reference before returning, so
//! the cross-reference invariant holds again at every boundary a later command
//! can observe.
//!
//! Each scan runs over a cloned snapshot of the collection, never the live
//! slice, because the repairs themselves go through `Store::set_*`.
//!
//! Store errors propagate unchanged. A missing originating entity is a caller
//! bug, not something to paper over here.

use tracing::debug;

use crate::errors::{ClassbookError, EntityKind, Result};
use crate::model::{Lesson, Person, PersonId};
use crate::ops::Store;

/// Replace every person's copy of `old` with `new`
///
/// Returns the number of persons repaired.
///
/// # Errors
///
/// Propagates `EntityNotFound`/`DuplicateEntity` from `Store::set_person`.
pub fn on_lesson_edited(store: &mut Store, old: &Lesson, new: &Lesson) -> Result<usize> {
    let holders: Vec<Person> = store
        .persons()
        .iter()
        .filter(|p| p.lessons.contains(old))
        .cloned()
        .collect();

    for holder in &holders {
        let repaired = holder.with_lesson_replaced(old, new.clone());
        store.set_person(holder, repaired)?;
    }

    debug!(
        class_name = %new.class_name,
        repaired = holders.len(),
        "refreshed embedded lesson copies"
    );
    Ok(holders.len())
}

/// Strip `deleted` (matched by class name) from every person's lesson set
///
/// # Errors
///
/// Propagates store errors from `Store::set_person`.
pub fn on_lesson_deleted(store: &mut Store, deleted: &Lesson) -> Result<usize> {
    let holders: Vec<Person> = store
        .persons()
        .iter()
        .filter(|p| p.lesson_named(&deleted.class_name).is_some())
        .cloned()
        .collect();

    for holder in &holders {
        let repaired = holder.without_lesson_named(&deleted.class_name);
        store.set_person(holder, repaired)?;
    }

    debug!(
        class_name = %deleted.class_name,
        repaired = holders.len(),
        "removed deleted lesson from persons"
    );
    Ok(holders.len())
}

/// Strip `deleted`'s id from every lesson that lists it
///
/// Removing a student changes the lesson, so the copies held by the remaining
/// students are refreshed as well.
///
/// # Errors
///
/// Propagates store errors from `Store::set_lesson`/`Store::set_person`.
pub fn on_person_deleted(store: &mut Store, deleted: &Person) -> Result<usize> {
    let affected: Vec<Lesson> = store
        .lessons()
        .iter()
        .filter(|l| l.has_student(&deleted.id))
        .cloned()
        .collect();

    for lesson in &affected {
        let repaired = lesson.without_student(&deleted.id);
        replace_lesson(store, lesson, &repaired)?;
    }

    debug!(
        person_id = %deleted.id,
        repaired = affected.len(),
        "removed deleted person from lessons"
    );
    Ok(affected.len())
}

/// Swap the authoritative `old` lesson for `new` and refresh every copy
///
/// # Errors
///
/// Propagates store errors, e.g. `DuplicateEntity` when `new` is renamed onto
/// an existing class name.
pub fn replace_lesson(store: &mut Store, old: &Lesson, new: &Lesson) -> Result<()> {
    store.set_lesson(old, new.clone())?;
    on_lesson_edited(store, old, new)?;
    Ok(())
}

/// Enrol `student` in `lesson`, updating both edges
///
/// Returns the updated lesson.
///
/// # Errors
///
/// Returns `EntityNotFound` if the student or the lesson is not in the store.
pub fn enrol(store: &mut Store, student: &PersonId, lesson: &Lesson) -> Result<Lesson> {
    let updated = lesson.with_student(student.clone());
    replace_lesson(store, lesson, &updated)?;

    let current = current_person(store, student)?;
    store.set_person(&current, current.with_lesson(updated.clone()))?;
    Ok(updated)
}

/// Remove `student` from `lesson`, updating both edges
///
/// Returns the updated lesson.
///
/// # Errors
///
/// Returns `EntityNotFound` if the student or the lesson is not in the store.
pub fn unenrol(store: &mut Store, student: &PersonId, lesson: &Lesson) -> Result<Lesson> {
    let current = current_person(store, student)?;
    store.set_person(&current, current.without_lesson_named(&lesson.class_name))?;

    let updated = lesson.without_student(student);
    replace_lesson(store, lesson, &updated)?;
    Ok(updated)
}

fn current_person(store: &Store, id: &PersonId) -> Result<Person> {
    store
        .person_by_id(id)
        .cloned()
        .ok_or_else(|| ClassbookError::EntityNotFound {
            entity: EntityKind::Person,
            key: id.to_string(),
        })
}
