use std::collections::HashMap;

use chrono::NaiveDate;

use crate::errors::EntityKind;
use crate::model::{PersonId, Role};
use crate::ops::Store;

/// Find persons that are identity-equal to an earlier person
///
/// Returns list of (first_id, duplicate_id) tuples
pub fn find_duplicate_persons(store: &Store) -> Vec<(PersonId, PersonId)> {
    let persons = store.persons();
    let mut duplicates = Vec::new();

    for (i, later) in persons.iter().enumerate() {
        if let Some(first) = persons[..i].iter().find(|p| p.is_same_person(later)) {
            duplicates.push((first.id.clone(), later.id.clone()));
        }
    }

    duplicates
}

/// Find class names repeated among lessons and person ids repeated among
/// persons
///
/// The two namespaces are separate, so a lesson may be named like a person id.
///
/// Returns the repeated keys with the kind of entity that repeats them
pub fn find_duplicate_keys(store: &Store) -> Vec<(EntityKind, String)> {
    let mut counts: HashMap<(EntityKind, String), usize> = HashMap::new();
    for lesson in store.lessons() {
        *counts
            .entry((EntityKind::Lesson, lesson.class_name.clone()))
            .or_insert(0) += 1;
    }
    for person in store.persons() {
        *counts
            .entry((EntityKind::Person, person.id.to_string()))
            .or_insert(0) += 1;
    }

    let mut repeated: Vec<(EntityKind, String)> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key)
        .collect();
    repeated.sort_by(|a, b| a.1.cmp(&b.1));
    repeated
}

/// Find embedded lesson copies whose authoritative lesson does not list the
/// holder as a student (or does not exist at all)
///
/// Returns list of (person_id, class_name) tuples
pub fn find_unbacked_lesson_copies(store: &Store) -> Vec<(PersonId, String)> {
    let mut unbacked = Vec::new();

    for person in store.persons() {
        for copy in &person.lessons {
            let backed = store
                .lesson_by_name(&copy.class_name)
                .is_some_and(|l| l.has_student(&person.id));
            if !backed {
                unbacked.push((person.id.clone(), copy.class_name.clone()));
            }
        }
    }

    unbacked
}

/// Find lesson student ids whose person does not hold a copy of that lesson
///
/// Covers ids of persons that no longer exist.
///
/// Returns list of (class_name, person_id) tuples
pub fn find_unreciprocated_students(store: &Store) -> Vec<(String, PersonId)> {
    let mut unreciprocated = Vec::new();

    for lesson in store.lessons() {
        for id in &lesson.students {
            let holds = store
                .person_by_id(id)
                .is_some_and(|p| p.lesson_named(&lesson.class_name).is_some());
            if !holds {
                unreciprocated.push((lesson.class_name.clone(), id.clone()));
            }
        }
    }

    unreciprocated
}

/// Find embedded lesson copies that are no longer value-equal to the
/// authoritative lesson of the same class name
///
/// Returns list of (person_id, class_name) tuples
pub fn find_stale_lesson_copies(store: &Store) -> Vec<(PersonId, String)> {
    let mut stale = Vec::new();

    for person in store.persons() {
        for copy in &person.lessons {
            if let Some(authoritative) = store.lesson_by_name(&copy.class_name) {
                if authoritative != copy {
                    stale.push((person.id.clone(), copy.class_name.clone()));
                }
            }
        }
    }

    stale
}

/// Find lessons whose tutor id does not name an existing tutor
///
/// Returns list of (class_name, tutor_id) tuples
pub fn find_invalid_tutors(store: &Store) -> Vec<(String, PersonId)> {
    store
        .lessons()
        .iter()
        .filter(|l| !store.person_by_id(&l.tutor_id).is_some_and(|p| p.is_tutor()))
        .map(|l| (l.class_name.clone(), l.tutor_id.clone()))
        .collect()
}

/// Find tutors that hold lesson copies or appear in a student set
///
/// Returns the offending ids
pub fn find_tutors_as_students(store: &Store) -> Vec<PersonId> {
    let mut offenders: Vec<PersonId> = store
        .persons()
        .iter()
        .filter(|p| p.is_tutor() && !p.lessons.is_empty())
        .map(|p| p.id.clone())
        .collect();

    for lesson in store.lessons() {
        for id in &lesson.students {
            if id.role() == Role::Tutor && !offenders.contains(id) {
                offenders.push(id.clone());
            }
        }
    }

    offenders
}

/// Find attendance marks for students not enrolled in the lesson
///
/// Returns list of (class_name, date, person_id) tuples
pub fn find_attendance_outside_enrolment(store: &Store) -> Vec<(String, NaiveDate, PersonId)> {
    let mut stray = Vec::new();

    for lesson in store.lessons() {
        for (date, present) in &lesson.attendance {
            for id in present {
                if !lesson.has_student(id) {
                    stray.push((lesson.class_name.clone(), *date, id.clone()));
                }
            }
        }
    }

    stray
}
