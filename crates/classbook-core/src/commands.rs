//! Command types
//!
//! A `Command` is either direct (applied as soon as it resolves) or
//! confirmable (held by the confirmation gate until the user answers, unless
//! it was built as forced). Resolving a command against the current state
//! produces a `Mutation`: every index and class name turned into the entity
//! value it names. Only mutations reach `apply()`.

use chrono::NaiveDate;

use crate::errors::{ClassbookError, Result};
use crate::history::ViewHint;
use crate::model::{Lesson, LessonDetails, LessonEdit, Person, PersonDetails, PersonEdit, PersonId};
use crate::ops::{person_ops, Store};

/// How a command names a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonRef {
    /// 1-based position in the currently visible person list
    Index(usize),
    /// Identifier, looked up in the whole store
    Id(PersonId),
}

impl std::fmt::Display for PersonRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonRef::Index(i) => write!(f, "{}", i),
            PersonRef::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Keyword filter over person names
///
/// A person matches when any keyword equals any whitespace-separated word of
/// their name, ignoring case. No keywords matches everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    keywords: Vec<String>,
}

impl PersonFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| Into::<String>::into(k).to_lowercase())
                .filter(|k| !k.trim().is_empty())
                .collect(),
        }
    }

    /// Filter that shows every person
    pub fn all() -> Self {
        Self::default()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn matches(&self, person: &Person) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        person
            .name
            .split_whitespace()
            .map(str::to_lowercase)
            .any(|word| self.keywords.contains(&word))
    }
}

/// Commands that never need confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum DirectCommand {
    AddPerson(PersonDetails),
    EditPerson { target: PersonRef, edit: PersonEdit },
    AddLesson(LessonDetails),
    EditLesson { class_name: String, edit: LessonEdit },
    Enrol { student: PersonRef, class_name: String },
    Unenrol { student: PersonRef, class_name: String },
    Mark { student: PersonRef, class_name: String, date: NaiveDate },
    Unmark { student: PersonRef, class_name: String, date: NaiveDate },
    /// Narrow the visible person list
    Find(PersonFilter),
    /// Show every person again
    List,
    Undo,
    Redo,
}

/// Irreversible actions that go through the confirmation gate
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmableAction {
    DeletePerson(PersonRef),
    DeleteLesson(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmableCommand {
    pub action: ConfirmableAction,
    /// Skip the gate and apply immediately
    pub forced: bool,
}

impl ConfirmableCommand {
    pub fn new(action: ConfirmableAction) -> Self {
        Self {
            action,
            forced: false,
        }
    }

    pub fn forced(action: ConfirmableAction) -> Self {
        Self {
            action,
            forced: true,
        }
    }

    /// Resolve the target and build the prompt
    ///
    /// Runs before the gate sees the command, so a prompt never names a
    /// target that does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for an unknown target or a tutor who still
    /// teaches lessons.
    pub fn validate(&self, selection: &Selection<'_>) -> Result<ValidatedCommand> {
        match &self.action {
            ConfirmableAction::DeletePerson(target) => {
                let person = selection.resolve_person(target)?;
                person_ops::ensure_deletable(selection.store(), &person)?;
                let prompt = format!(
                    "Are you sure you want to delete {} ({})? (y/n)",
                    person.name, person.id
                );
                Ok(ValidatedCommand::new(Mutation::DeletePerson(person), prompt))
            }
            ConfirmableAction::DeleteLesson(class_name) => {
                let lesson = selection.resolve_lesson(class_name)?;
                let prompt = format!(
                    "Are you sure you want to delete lesson {}? (y/n)",
                    lesson.class_name
                );
                Ok(ValidatedCommand::new(Mutation::DeleteLesson(lesson), prompt))
            }
            ConfirmableAction::Clear => Ok(ValidatedCommand::new(
                Mutation::Clear,
                "Are you sure you want to clear all persons and lessons? (y/n)",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Direct(DirectCommand),
    Confirmable(ConfirmableCommand),
}

impl Command {
    pub fn is_forced(&self) -> bool {
        matches!(self, Command::Confirmable(c) if c.forced)
    }

    /// Operation name used in log events
    pub fn name(&self) -> &'static str {
        match self {
            Command::Direct(direct) => match direct {
                DirectCommand::AddPerson(_) => "add_person",
                DirectCommand::EditPerson { .. } => "edit_person",
                DirectCommand::AddLesson(_) => "add_lesson",
                DirectCommand::EditLesson { .. } => "edit_lesson",
                DirectCommand::Enrol { .. } => "enrol",
                DirectCommand::Unenrol { .. } => "unenrol",
                DirectCommand::Mark { .. } => "mark",
                DirectCommand::Unmark { .. } => "unmark",
                DirectCommand::Find(_) => "find",
                DirectCommand::List => "list",
                DirectCommand::Undo => "undo",
                DirectCommand::Redo => "redo",
            },
            Command::Confirmable(c) => match c.action {
                ConfirmableAction::DeletePerson(_) => "delete_person",
                ConfirmableAction::DeleteLesson(_) => "delete_lesson",
                ConfirmableAction::Clear => "clear",
            },
        }
    }
}

impl From<DirectCommand> for Command {
    fn from(cmd: DirectCommand) -> Self {
        Command::Direct(cmd)
    }
}

impl From<ConfirmableCommand> for Command {
    fn from(cmd: ConfirmableCommand) -> Self {
        Command::Confirmable(cmd)
    }
}

/// A store change with every target resolved to its current value
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddPerson(PersonDetails),
    EditPerson { target: Person, edit: PersonEdit },
    DeletePerson(Person),
    AddLesson(LessonDetails),
    EditLesson { target: Lesson, edit: LessonEdit },
    DeleteLesson(Lesson),
    Enrol { student: Person, lesson: Lesson },
    Unenrol { student: Person, lesson: Lesson },
    Mark { student: Person, lesson: Lesson, date: NaiveDate },
    Unmark { student: Person, lesson: Lesson, date: NaiveDate },
    Clear,
}

impl Mutation {
    /// Which list best shows the effect
    pub fn hint(&self) -> ViewHint {
        match self {
            Mutation::AddPerson(_)
            | Mutation::EditPerson { .. }
            | Mutation::DeletePerson(_)
            | Mutation::Clear => ViewHint::Persons,
            Mutation::AddLesson(_)
            | Mutation::EditLesson { .. }
            | Mutation::DeleteLesson(_)
            | Mutation::Enrol { .. }
            | Mutation::Unenrol { .. }
            | Mutation::Mark { .. }
            | Mutation::Unmark { .. } => ViewHint::Lessons,
        }
    }
}

/// A confirmable command that passed validation, with its prompt
///
/// The gate only stores values of this type.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCommand {
    mutation: Mutation,
    prompt: String,
}

impl ValidatedCommand {
    fn new(mutation: Mutation, prompt: impl Into<String>) -> Self {
        Self {
            mutation,
            prompt: prompt.into(),
        }
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn into_mutation(self) -> Mutation {
        self.mutation
    }
}

/// The store as the user currently sees it
pub struct Selection<'a> {
    store: &'a Store,
    filter: &'a PersonFilter,
}

impl<'a> Selection<'a> {
    pub fn new(store: &'a Store, filter: &'a PersonFilter) -> Self {
        Self { store, filter }
    }

    pub fn store(&self) -> &'a Store {
        self.store
    }

    /// Persons passing the filter, in store order
    pub fn visible_persons(&self) -> Vec<&'a Person> {
        self.store
            .persons()
            .iter()
            .filter(|p| self.filter.matches(p))
            .collect()
    }

    /// # Errors
    ///
    /// Returns `ValidationFailed` for an index outside the visible list or an
    /// id nobody carries.
    pub fn resolve_person(&self, target: &PersonRef) -> Result<Person> {
        match target {
            PersonRef::Index(index) => index
                .checked_sub(1)
                .and_then(|i| self.visible_persons().get(i).copied())
                .cloned()
                .ok_or_else(|| ClassbookError::validation("The person index provided is invalid")),
            PersonRef::Id(id) => self
                .store
                .person_by_id(id)
                .cloned()
                .ok_or_else(|| ClassbookError::validation(format!("No person with id {}", id))),
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationFailed` if no lesson has that class name.
    pub fn resolve_lesson(&self, class_name: &str) -> Result<Lesson> {
        self.store
            .lesson_by_name(class_name)
            .cloned()
            .ok_or_else(|| ClassbookError::validation(format!("No lesson named {}", class_name)))
    }
}

impl DirectCommand {
    /// Resolve a mutating command against `selection`
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` for unknown targets, and for `Find`, `List`,
    /// `Undo` and `Redo`, which act on the session rather than the store.
    pub fn resolve(&self, selection: &Selection<'_>) -> Result<Mutation> {
        match self {
            DirectCommand::AddPerson(details) => Ok(Mutation::AddPerson(details.clone())),
            DirectCommand::EditPerson { target, edit } => Ok(Mutation::EditPerson {
                target: selection.resolve_person(target)?,
                edit: edit.clone(),
            }),
            DirectCommand::AddLesson(details) => Ok(Mutation::AddLesson(details.clone())),
            DirectCommand::EditLesson { class_name, edit } => Ok(Mutation::EditLesson {
                target: selection.resolve_lesson(class_name)?,
                edit: edit.clone(),
            }),
            DirectCommand::Enrol {
                student,
                class_name,
            } => Ok(Mutation::Enrol {
                student: selection.resolve_person(student)?,
                lesson: selection.resolve_lesson(class_name)?,
            }),
            DirectCommand::Unenrol {
                student,
                class_name,
            } => Ok(Mutation::Unenrol {
                student: selection.resolve_person(student)?,
                lesson: selection.resolve_lesson(class_name)?,
            }),
            DirectCommand::Mark {
                student,
                class_name,
                date,
            } => Ok(Mutation::Mark {
                student: selection.resolve_person(student)?,
                lesson: selection.resolve_lesson(class_name)?,
                date: *date,
            }),
            DirectCommand::Unmark {
                student,
                class_name,
                date,
            } => Ok(Mutation::Unmark {
                student: selection.resolve_person(student)?,
                lesson: selection.resolve_lesson(class_name)?,
                date: *date,
            }),
            DirectCommand::Find(_)
            | DirectCommand::List
            | DirectCommand::Undo
            | DirectCommand::Redo => Err(ClassbookError::validation(
                "This command does not change persons or lessons",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Day, Role, TimeRange};
    use crate::ops::{lesson_ops, person_ops};
    use std::collections::BTreeSet;

    fn seeded() -> Store {
        let mut store = Store::new();
        for (name, role) in [
            ("Tan Ah Kow", Role::Tutor),
            ("Alex Yeoh", Role::Student),
            ("Bernice Yu", Role::Student),
        ] {
            person_ops::add_person(
                &mut store,
                PersonDetails {
                    name: name.to_string(),
                    role,
                    phone: "91234567".to_string(),
                    email: "x@example.com".to_string(),
                    address: "1 Kent Ridge".to_string(),
                    tags: BTreeSet::new(),
                },
            )
            .unwrap();
        }
        lesson_ops::add_lesson(
            &mut store,
            LessonDetails {
                class_name: "A1a".to_string(),
                day: Day::Monday,
                time: TimeRange::parse("1200-1400").unwrap(),
                tutor_id: PersonId::new(Role::Tutor, 1),
                tags: BTreeSet::new(),
            },
        )
        .unwrap();
        store
    }

    #[test]
    fn test_filter_matches_whole_words_ignoring_case() {
        let store = seeded();
        let filter = PersonFilter::new(["YEOH"]);
        let names: Vec<&str> = store
            .persons()
            .iter()
            .filter(|p| filter.matches(p))
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alex Yeoh"]);

        assert!(!PersonFilter::new(["Yeo"]).matches(&store.persons()[1]));
        assert!(PersonFilter::all().matches(&store.persons()[0]));
    }

    #[test]
    fn test_index_resolves_against_visible_list() {
        let store = seeded();
        let filter = PersonFilter::new(["bernice"]);
        let selection = Selection::new(&store, &filter);

        let person = selection.resolve_person(&PersonRef::Index(1)).unwrap();
        assert_eq!(person.name, "Bernice Yu");
        assert!(selection.resolve_person(&PersonRef::Index(2)).is_err());
        assert!(selection.resolve_person(&PersonRef::Index(0)).is_err());
    }

    #[test]
    fn test_id_resolves_against_whole_store() {
        let store = seeded();
        let filter = PersonFilter::new(["bernice"]);
        let selection = Selection::new(&store, &filter);

        let alex = selection
            .resolve_person(&PersonRef::Id(PersonId::new(Role::Student, 1)))
            .unwrap();
        assert_eq!(alex.name, "Alex Yeoh");
        assert!(selection
            .resolve_person(&PersonRef::Id(PersonId::new(Role::Student, 9)))
            .is_err());
    }

    #[test]
    fn test_validate_delete_builds_prompt() {
        let store = seeded();
        let filter = PersonFilter::all();
        let selection = Selection::new(&store, &filter);

        let validated =
            ConfirmableCommand::new(ConfirmableAction::DeletePerson(PersonRef::Index(2)))
                .validate(&selection)
                .unwrap();
        assert_eq!(
            validated.prompt(),
            "Are you sure you want to delete Alex Yeoh (S1)? (y/n)"
        );
        assert!(matches!(validated.mutation(), Mutation::DeletePerson(p) if p.name == "Alex Yeoh"));
    }

    #[test]
    fn test_validate_refuses_teaching_tutor() {
        let store = seeded();
        let filter = PersonFilter::all();
        let selection = Selection::new(&store, &filter);

        let result = ConfirmableCommand::new(ConfirmableAction::DeletePerson(PersonRef::Index(1)))
            .validate(&selection);
        assert!(matches!(result, Err(ClassbookError::ValidationFailed { .. })));
    }

    #[test]
    fn test_validate_unknown_lesson() {
        let store = seeded();
        let filter = PersonFilter::all();
        let selection = Selection::new(&store, &filter);

        let result =
            ConfirmableCommand::forced(ConfirmableAction::DeleteLesson("Z9z".to_string()))
                .validate(&selection);
        assert!(matches!(
            result,
            Err(ClassbookError::ValidationFailed { reason }) if reason.contains("Z9z")
        ));
    }

    #[test]
    fn test_session_commands_do_not_resolve() {
        let store = seeded();
        let filter = PersonFilter::all();
        let selection = Selection::new(&store, &filter);
        assert!(DirectCommand::Undo.resolve(&selection).is_err());
    }

    #[test]
    fn test_command_names_and_force() {
        let forced: Command = ConfirmableCommand::forced(ConfirmableAction::Clear).into();
        assert!(forced.is_forced());
        assert_eq!(forced.name(), "clear");

        let direct: Command = DirectCommand::List.into();
        assert!(!direct.is_forced());
        assert_eq!(direct.name(), "list");
    }
}
