//! On-disk document format
//!
//! A data file is a single JSON object:
//!
//! ```text
//! {
//!   "version": 1,
//!   "next_student_id": 3,
//!   "next_tutor_id": 2,
//!   "persons": [ { "id": "S1", "name": "...", "lessons": [ ... ], ... } ],
//!   "lessons": [ { "class_name": "A1a", "time": "1200-1400", ... } ]
//! }
//! ```
//!
//! Students carry full copies of their lessons, so the file can be read
//! without joining anything. The id counters are saved because the highest
//! ids may belong to persons deleted before the save.

use std::path::Path;

use classbook_core::model::{Lesson, Person, PersonId, Role};
use classbook_core::rules::validate_store;
use classbook_core::Store;
use serde::{Deserialize, Serialize};

use crate::errors::{invalid_data, Result};

/// Current document version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u32,
    pub next_student_id: u32,
    pub next_tutor_id: u32,
    pub persons: Vec<Person>,
    pub lessons: Vec<Lesson>,
}

impl StoreDocument {
    pub fn from_store(store: &Store) -> Self {
        Self {
            version: FORMAT_VERSION,
            next_student_id: store.ids().peek(Role::Student).number(),
            next_tutor_id: store.ids().peek(Role::Tutor).number(),
            persons: store.persons().to_vec(),
            lessons: store.lessons().to_vec(),
        }
    }

    /// Rebuild a store through the checked insert operations
    ///
    /// `path` is only used for error context.
    ///
    /// # Errors
    ///
    /// Returns an `InvariantViolation`-kind error if the version is unknown,
    /// a person's id disagrees with their role, a record is duplicated, or the
    /// cross-references do not validate.
    pub fn into_store(self, path: &Path) -> Result<Store> {
        if self.version != FORMAT_VERSION {
            return Err(invalid_data(
                path,
                format!(
                    "Unsupported data file version {} (expected {})",
                    self.version, FORMAT_VERSION
                ),
            ));
        }

        let mut store = Store::new();
        for person in self.persons {
            if person.id.role() != person.role {
                return Err(invalid_data(
                    path,
                    format!(
                        "Person {} has role {} but a {} id",
                        person.name,
                        person.role,
                        person.id.role()
                    ),
                ));
            }
            store
                .add_person(person)
                .map_err(|e| invalid_data(path, e.to_string()))?;
        }
        for lesson in self.lessons {
            store
                .add_lesson(lesson)
                .map_err(|e| invalid_data(path, e.to_string()))?;
        }

        retire_below(&mut store, Role::Student, self.next_student_id);
        retire_below(&mut store, Role::Tutor, self.next_tutor_id);

        validate_store(&store).map_err(|e| invalid_data(path, e.to_string()))?;
        Ok(store)
    }
}

fn retire_below(store: &mut Store, role: Role, next: u32) {
    if next > 1 {
        store.retire_id(&PersonId::new(role, next - 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classbook_core::model::{Day, LessonDetails, PersonDetails, TimeRange};
    use classbook_core::ops::{lesson_ops, person_ops};
    use std::collections::BTreeSet;

    fn details(name: &str, role: Role) -> PersonDetails {
        PersonDetails {
            name: name.to_string(),
            role,
            phone: "91234567".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            address: "1 Kent Ridge".to_string(),
            tags: BTreeSet::new(),
        }
    }

    fn populated() -> Store {
        let mut store = Store::new();
        let tutor = person_ops::add_person(&mut store, details("Tan", Role::Tutor)).unwrap();
        let student = person_ops::add_person(&mut store, details("Alex", Role::Student)).unwrap();
        let lesson = lesson_ops::add_lesson(
            &mut store,
            LessonDetails {
                class_name: "A1a".to_string(),
                day: Day::Monday,
                time: TimeRange::parse("1200-1400").unwrap(),
                tutor_id: tutor.id,
                tags: BTreeSet::new(),
            },
        )
        .unwrap();
        lesson_ops::enrol(&mut store, &student, &lesson).unwrap();
        store
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let store = populated();
        let json = serde_json::to_string(&StoreDocument::from_store(&store)).unwrap();

        let doc: StoreDocument = serde_json::from_str(&json).unwrap();
        let restored = doc.into_store(Path::new("test.json")).unwrap();

        assert_eq!(restored, store);
    }

    #[test]
    fn test_counters_survive_deleted_highest_id() {
        let mut store = populated();
        let extra = person_ops::add_person(&mut store, details("Bernice", Role::Student)).unwrap();
        person_ops::delete_person(&mut store, &extra).unwrap();

        let doc = StoreDocument::from_store(&store);
        assert_eq!(doc.next_student_id, 3);

        let restored = doc.into_store(Path::new("test.json")).unwrap();
        assert_eq!(restored.next_person_id(Role::Student).to_string(), "S3");
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut doc = StoreDocument::from_store(&populated());
        doc.version = 99;

        let err = doc.into_store(Path::new("test.json")).unwrap_err();
        assert!(err.message().contains("version 99"));
    }

    #[test]
    fn test_missing_lesson_rejected() {
        let mut doc = StoreDocument::from_store(&populated());
        doc.lessons.clear();

        let err = doc.into_store(Path::new("test.json")).unwrap_err();
        assert_eq!(err.kind(), classbook_core::ExErrorKind::InvariantViolation);
    }

    #[test]
    fn test_role_id_mismatch_rejected() {
        let mut doc = StoreDocument::from_store(&populated());
        doc.persons[0].role = Role::Student;

        assert!(doc.into_store(Path::new("test.json")).is_err());
    }
}
