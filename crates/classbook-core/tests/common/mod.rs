use std::collections::BTreeSet;

use classbook_core::commands::{ConfirmableAction, ConfirmableCommand, DirectCommand, PersonRef};
use classbook_core::model::{Day, LessonDetails, PersonDetails, PersonId, Role, TimeRange};
use classbook_core::ops::{lesson_ops, person_ops};
use classbook_core::rules::validate_store;
use classbook_core::{Command, Session, Store};

/// Details for a person with contact fields derived from the name
#[allow(dead_code)]
pub fn person_details(name: &str, role: Role) -> PersonDetails {
    PersonDetails {
        name: name.to_string(),
        role,
        phone: "91234567".to_string(),
        email: format!("{}@example.com", name.replace(' ', ".").to_lowercase()),
        address: "Blk 30 Geylang Street 29".to_string(),
        tags: BTreeSet::new(),
    }
}

#[allow(dead_code)]
pub fn lesson_details(class_name: &str, time: &str, tutor: &str) -> LessonDetails {
    LessonDetails {
        class_name: class_name.to_string(),
        day: Day::Monday,
        time: TimeRange::parse(time).unwrap(),
        tutor_id: id(tutor),
        tags: BTreeSet::new(),
    }
}

#[allow(dead_code)]
pub fn id(raw: &str) -> PersonId {
    PersonId::parse(raw).unwrap()
}

/// Store with tutor T1 and students S1 (Alex Yeoh) and S2 (Bernice Yu)
#[allow(dead_code)]
pub fn roster() -> Store {
    let mut store = Store::new();
    person_ops::add_person(&mut store, person_details("Tan Ah Kow", Role::Tutor)).unwrap();
    person_ops::add_person(&mut store, person_details("Alex Yeoh", Role::Student)).unwrap();
    person_ops::add_person(&mut store, person_details("Bernice Yu", Role::Student)).unwrap();
    store
}

/// `roster()` plus lesson A1a taught by T1
#[allow(dead_code)]
pub fn roster_with_lesson() -> Store {
    let mut store = roster();
    lesson_ops::add_lesson(&mut store, lesson_details("A1a", "1200-1400", "T1")).unwrap();
    store
}

#[allow(dead_code)]
pub fn session_on(store: Store) -> Session {
    Session::in_memory(store)
}

#[allow(dead_code)]
pub fn add_lesson(class_name: &str, time: &str, tutor: &str) -> Command {
    Command::Direct(DirectCommand::AddLesson(lesson_details(
        class_name, time, tutor,
    )))
}

#[allow(dead_code)]
pub fn add_student(name: &str) -> Command {
    Command::Direct(DirectCommand::AddPerson(person_details(name, Role::Student)))
}

#[allow(dead_code)]
pub fn enrol(student: &str, class_name: &str) -> Command {
    Command::Direct(DirectCommand::Enrol {
        student: PersonRef::Id(id(student)),
        class_name: class_name.to_string(),
    })
}

#[allow(dead_code)]
pub fn delete_lesson(class_name: &str) -> Command {
    Command::Confirmable(ConfirmableCommand::new(ConfirmableAction::DeleteLesson(
        class_name.to_string(),
    )))
}

#[allow(dead_code)]
pub fn force_delete_lesson(class_name: &str) -> Command {
    Command::Confirmable(ConfirmableCommand::forced(ConfirmableAction::DeleteLesson(
        class_name.to_string(),
    )))
}

#[allow(dead_code)]
pub fn clear() -> Command {
    Command::Confirmable(ConfirmableCommand::new(ConfirmableAction::Clear))
}

/// Panic with the violation if the store is not fully consistent
#[allow(dead_code)]
pub fn assert_consistent(store: &Store) {
    if let Err(e) = validate_store(store) {
        panic!("store is inconsistent: {}", e);
    }
}
