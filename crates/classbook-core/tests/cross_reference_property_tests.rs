//! Property tests for cross-reference consistency.
//!
//! Random command sequences run through a `Session`. Whatever succeeds or
//! fails, the store must validate after every step, and the snapshot log
//! must walk back to the starting state and forward again unchanged.

mod common;

use chrono::NaiveDate;
use classbook_core::commands::{ConfirmableAction, ConfirmableCommand, DirectCommand, PersonRef};
use classbook_core::model::{Day, LessonEdit, Role, TimeRange};
use classbook_core::{Command, Session, Store};
use common::*;
use proptest::prelude::*;

const CLASSES: [&str; 4] = ["A1a", "B2b", "S1", "T2"];
const TIMES: [&str; 3] = ["0900-1000", "1200-1400", "1500-1700"];

#[derive(Clone, Debug)]
enum Step {
    AddStudent(u8),
    AddTutor(u8),
    AddLesson { class: usize, time: usize, tutor: u32 },
    EditTime { class: usize, time: usize },
    Rename { class: usize, to: usize },
    Retutor { class: usize, tutor: u32 },
    Enrol { student: u32, class: usize },
    Unenrol { student: u32, class: usize },
    Mark { student: u32, class: usize, day: u32 },
    DeletePerson { id: u32, tutor: bool },
    DeleteLesson { class: usize },
    Undo,
    Redo,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let class = 0..CLASSES.len();
    let time = 0..TIMES.len();
    let person = 1u32..5;
    prop_oneof![
        (0u8..50).prop_map(Step::AddStudent),
        (0u8..50).prop_map(Step::AddTutor),
        (class.clone(), time.clone(), person.clone())
            .prop_map(|(class, time, tutor)| Step::AddLesson { class, time, tutor }),
        (class.clone(), time).prop_map(|(class, time)| Step::EditTime { class, time }),
        (class.clone(), class.clone()).prop_map(|(class, to)| Step::Rename { class, to }),
        (class.clone(), person.clone()).prop_map(|(class, tutor)| Step::Retutor { class, tutor }),
        (person.clone(), class.clone())
            .prop_map(|(student, class)| Step::Enrol { student, class }),
        (person.clone(), class.clone())
            .prop_map(|(student, class)| Step::Unenrol { student, class }),
        (person.clone(), class.clone(), 1u32..4)
            .prop_map(|(student, class, day)| Step::Mark { student, class, day }),
        (person, any::<bool>()).prop_map(|(id, tutor)| Step::DeletePerson { id, tutor }),
        class.prop_map(|class| Step::DeleteLesson { class }),
        Just(Step::Undo),
        Just(Step::Redo),
    ]
}

fn person_id(role: Role, number: u32) -> PersonRef {
    PersonRef::Id(classbook_core::PersonId::new(role, number))
}

fn to_command(step: &Step) -> Command {
    match step {
        Step::AddStudent(n) => add_student(&format!("Student {}", n)),
        Step::AddTutor(n) => Command::Direct(DirectCommand::AddPerson(person_details(
            &format!("Tutor {}", n),
            Role::Tutor,
        ))),
        Step::AddLesson { class, time, tutor } => {
            add_lesson(CLASSES[*class], TIMES[*time], &format!("T{}", tutor))
        }
        Step::EditTime { class, time } => Command::Direct(DirectCommand::EditLesson {
            class_name: CLASSES[*class].to_string(),
            edit: LessonEdit {
                time: Some(TimeRange::parse(TIMES[*time]).unwrap()),
                ..Default::default()
            },
        }),
        Step::Rename { class, to } => Command::Direct(DirectCommand::EditLesson {
            class_name: CLASSES[*class].to_string(),
            edit: LessonEdit {
                class_name: Some(CLASSES[*to].to_string()),
                day: Some(Day::Wednesday),
                ..Default::default()
            },
        }),
        Step::Retutor { class, tutor } => Command::Direct(DirectCommand::EditLesson {
            class_name: CLASSES[*class].to_string(),
            edit: LessonEdit {
                tutor_id: Some(classbook_core::PersonId::new(Role::Tutor, *tutor)),
                ..Default::default()
            },
        }),
        Step::Enrol { student, class } => Command::Direct(DirectCommand::Enrol {
            student: person_id(Role::Student, *student),
            class_name: CLASSES[*class].to_string(),
        }),
        Step::Unenrol { student, class } => Command::Direct(DirectCommand::Unenrol {
            student: person_id(Role::Student, *student),
            class_name: CLASSES[*class].to_string(),
        }),
        Step::Mark {
            student,
            class,
            day,
        } => Command::Direct(DirectCommand::Mark {
            student: person_id(Role::Student, *student),
            class_name: CLASSES[*class].to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, *day).unwrap(),
        }),
        Step::DeletePerson { id, tutor } => {
            let role = if *tutor { Role::Tutor } else { Role::Student };
            Command::Confirmable(ConfirmableCommand::forced(ConfirmableAction::DeletePerson(
                person_id(role, *id),
            )))
        }
        Step::DeleteLesson { class } => force_delete_lesson(CLASSES[*class]),
        Step::Undo => Command::Direct(DirectCommand::Undo),
        Step::Redo => Command::Direct(DirectCommand::Redo),
    }
}

fn run_all(session: &mut Session, steps: &[Step]) -> Result<(), TestCaseError> {
    for step in steps {
        let before = session.store().clone();
        let result = session.execute(to_command(step));
        if result.is_err() {
            prop_assert_eq!(session.store(), &before, "failed {:?} changed the store", step);
        }
        prop_assert!(
            classbook_core::rules::validate_store(session.store()).is_ok(),
            "inconsistent after {:?}",
            step
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_store_stays_consistent(steps in prop::collection::vec(step_strategy(), 1..40)) {
        let mut session = session_on(roster());
        run_all(&mut session, &steps)?;
    }

    #[test]
    fn prop_full_undo_then_full_redo(steps in prop::collection::vec(step_strategy(), 1..30)) {
        let initial = roster();
        let mut session = session_on(initial.clone());
        run_all(&mut session, &steps)?;
        while session.can_redo() {
            session.redo().unwrap();
        }
        let last: Store = session.store().clone();

        while session.can_undo() {
            session.undo().unwrap();
            prop_assert!(classbook_core::rules::validate_store(session.store()).is_ok());
        }
        prop_assert_eq!(session.store(), &initial);

        while session.can_redo() {
            session.redo().unwrap();
        }
        prop_assert_eq!(session.store(), &last);
    }
}
