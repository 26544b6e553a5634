//! Line parser
//!
//! Turns one input line into a `Command`. Arguments use prefix syntax: a word
//! starting with a known prefix such as `n/` opens a field, and the words that
//! follow belong to it until the next prefix. Words before the first prefix
//! form the preamble (an index, an id, or a class name).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use classbook_core::commands::{
    ConfirmableAction, ConfirmableCommand, DirectCommand, PersonFilter, PersonRef,
};
use classbook_core::model::{
    Day, LessonDetails, LessonEdit, PersonDetails, PersonEdit, PersonId, Role, TimeRange,
};
use classbook_core::Command;
use thiserror::Error;

const FORCE_FLAG: &str = "--force";

/// What a line asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Help,
    Exit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}. Type 'help' to see all commands.")]
    UnknownCommand(String),

    #[error("Invalid command format!\nUsage: {0}")]
    InvalidFormat(&'static str),

    #[error("{0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

pub const USAGE: &[(&str, &str)] = &[
    ("add-person", "add-person n/NAME r/student|tutor p/PHONE e/EMAIL a/ADDRESS [t/TAG]..."),
    ("edit-person", "edit-person INDEX|ID [n/NAME] [p/PHONE] [e/EMAIL] [a/ADDRESS] [t/TAG]..."),
    ("delete-person", "delete-person INDEX|ID [--force]"),
    ("add-lesson", "add-lesson c/CLASS d/DAY s/HHMM-HHMM tu/TUTOR_ID [t/TAG]..."),
    ("edit-lesson", "edit-lesson CLASS [c/CLASS] [d/DAY] [s/HHMM-HHMM] [tu/TUTOR_ID] [t/TAG]..."),
    ("delete-lesson", "delete-lesson CLASS [--force]"),
    ("enrol", "enrol INDEX|ID c/CLASS"),
    ("unenrol", "unenrol INDEX|ID c/CLASS"),
    ("mark", "mark INDEX|ID c/CLASS dt/YYYY-MM-DD"),
    ("unmark", "unmark INDEX|ID c/CLASS dt/YYYY-MM-DD"),
    ("find", "find KEYWORD [MORE_KEYWORDS]..."),
    ("list", "list"),
    ("clear", "clear [--force]"),
    ("undo", "undo"),
    ("redo", "redo"),
    ("help", "help"),
    ("exit", "exit"),
];

fn usage(word: &str) -> &'static str {
    USAGE
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, text)| *text)
        .unwrap_or("help")
}

/// Preamble and prefixed fields of one argument string
#[derive(Debug, Default)]
struct Arguments {
    preamble: String,
    forced: bool,
    fields: Vec<(&'static str, String)>,
}

impl Arguments {
    fn tokenize(args: &str, prefixes: &[&'static str]) -> Self {
        let mut parsed = Arguments::default();
        let mut preamble = Vec::new();
        let mut current: Option<(&'static str, Vec<&str>)> = None;

        for word in args.split_whitespace() {
            if word == FORCE_FLAG {
                parsed.forced = true;
                continue;
            }
            if let Some(&prefix) = prefixes.iter().find(|p| word.starts_with(**p)) {
                if let Some((open, words)) = current.take() {
                    parsed.fields.push((open, words.join(" ")));
                }
                let rest = &word[prefix.len()..];
                let words = if rest.is_empty() { Vec::new() } else { vec![rest] };
                current = Some((prefix, words));
                continue;
            }
            match current.as_mut() {
                Some((_, words)) => words.push(word),
                None => preamble.push(word),
            }
        }
        if let Some((open, words)) = current {
            parsed.fields.push((open, words.join(" ")));
        }
        parsed.preamble = preamble.join(" ");
        parsed
    }

    /// Last value given for `prefix`
    fn value(&self, prefix: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, prefix: &str, command: &str) -> Result<&str> {
        match self.value(prefix) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ParseError::InvalidFormat(usage(command))),
        }
    }

    /// Value for an optional field; a field that is present must not be empty
    fn optional(&self, prefix: &str, command: &str) -> Result<Option<&str>> {
        match self.value(prefix) {
            Some("") => Err(ParseError::InvalidFormat(usage(command))),
            other => Ok(other),
        }
    }

    fn has(&self, prefix: &str) -> bool {
        self.fields.iter().any(|(p, _)| *p == prefix)
    }

    /// Every non-empty value for `prefix`; a bare prefix yields an empty set
    fn all(&self, prefix: &str) -> BTreeSet<String> {
        self.fields
            .iter()
            .filter(|(p, v)| *p == prefix && !v.is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn tags(&self) -> Option<BTreeSet<String>> {
        self.has("t/").then(|| self.all("t/"))
    }
}

/// Parse one line of user input
///
/// # Errors
///
/// Returns `UnknownCommand` for an unrecognised first word, `InvalidFormat`
/// when required parts are missing, and `InvalidValue` when a field does not
/// parse (role, day, time range, id or date).
pub fn parse(line: &str) -> Result<Input> {
    let trimmed = line.trim();
    let (word, args) = match trimmed.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (trimmed, ""),
    };

    let command = match word {
        "add-person" => add_person(args)?,
        "edit-person" => edit_person(args)?,
        "delete-person" => {
            let parsed = Arguments::tokenize(args, &[]);
            let target = person_ref(&parsed.preamble, word)?;
            confirmable(ConfirmableAction::DeletePerson(target), parsed.forced)
        }
        "add-lesson" => add_lesson(args)?,
        "edit-lesson" => edit_lesson(args)?,
        "delete-lesson" => {
            let parsed = Arguments::tokenize(args, &[]);
            if parsed.preamble.is_empty() {
                return Err(ParseError::InvalidFormat(usage(word)));
            }
            confirmable(ConfirmableAction::DeleteLesson(parsed.preamble), parsed.forced)
        }
        "enrol" | "unenrol" => {
            let parsed = Arguments::tokenize(args, &["c/"]);
            let student = person_ref(&parsed.preamble, word)?;
            let class_name = parsed.require("c/", word)?.to_string();
            if word == "enrol" {
                DirectCommand::Enrol { student, class_name }.into()
            } else {
                DirectCommand::Unenrol { student, class_name }.into()
            }
        }
        "mark" | "unmark" => {
            let parsed = Arguments::tokenize(args, &["c/", "dt/"]);
            let student = person_ref(&parsed.preamble, word)?;
            let class_name = parsed.require("c/", word)?.to_string();
            let date = date(parsed.require("dt/", word)?)?;
            if word == "mark" {
                DirectCommand::Mark { student, class_name, date }.into()
            } else {
                DirectCommand::Unmark { student, class_name, date }.into()
            }
        }
        "find" => {
            if args.is_empty() {
                return Err(ParseError::InvalidFormat(usage(word)));
            }
            DirectCommand::Find(PersonFilter::new(args.split_whitespace())).into()
        }
        "list" => DirectCommand::List.into(),
        "clear" => {
            let parsed = Arguments::tokenize(args, &[]);
            confirmable(ConfirmableAction::Clear, parsed.forced)
        }
        "undo" => DirectCommand::Undo.into(),
        "redo" => DirectCommand::Redo.into(),
        "help" => return Ok(Input::Help),
        "exit" => return Ok(Input::Exit),
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(Input::Command(command))
}

fn confirmable(action: ConfirmableAction, forced: bool) -> Command {
    if forced {
        ConfirmableCommand::forced(action).into()
    } else {
        ConfirmableCommand::new(action).into()
    }
}

fn add_person(args: &str) -> Result<Command> {
    let parsed = Arguments::tokenize(args, &["n/", "r/", "p/", "e/", "a/", "t/"]);
    let command = "add-person";
    if !parsed.preamble.is_empty() {
        return Err(ParseError::InvalidFormat(usage(command)));
    }

    let raw_role = parsed.require("r/", command)?;
    let role = Role::parse(raw_role).ok_or_else(|| {
        ParseError::InvalidValue(format!(
            "Role must be 'student' or 'tutor', got '{}'",
            raw_role
        ))
    })?;

    Ok(DirectCommand::AddPerson(PersonDetails {
        name: parsed.require("n/", command)?.to_string(),
        role,
        phone: parsed.require("p/", command)?.to_string(),
        email: parsed.require("e/", command)?.to_string(),
        address: parsed.require("a/", command)?.to_string(),
        tags: parsed.all("t/"),
    })
    .into())
}

fn edit_person(args: &str) -> Result<Command> {
    let parsed = Arguments::tokenize(args, &["n/", "p/", "e/", "a/", "t/"]);
    let command = "edit-person";
    let target = person_ref(&parsed.preamble, command)?;

    let edit = PersonEdit {
        name: parsed.optional("n/", command)?.map(str::to_string),
        phone: parsed.optional("p/", command)?.map(str::to_string),
        email: parsed.optional("e/", command)?.map(str::to_string),
        address: parsed.optional("a/", command)?.map(str::to_string),
        tags: parsed.tags(),
    };
    Ok(DirectCommand::EditPerson { target, edit }.into())
}

fn add_lesson(args: &str) -> Result<Command> {
    let parsed = Arguments::tokenize(args, &["c/", "d/", "s/", "tu/", "t/"]);
    let command = "add-lesson";
    if !parsed.preamble.is_empty() {
        return Err(ParseError::InvalidFormat(usage(command)));
    }

    Ok(DirectCommand::AddLesson(LessonDetails {
        class_name: parsed.require("c/", command)?.to_string(),
        day: day(parsed.require("d/", command)?)?,
        time: time_range(parsed.require("s/", command)?)?,
        tutor_id: person_id(parsed.require("tu/", command)?)?,
        tags: parsed.all("t/"),
    })
    .into())
}

fn edit_lesson(args: &str) -> Result<Command> {
    let parsed = Arguments::tokenize(args, &["c/", "d/", "s/", "tu/", "t/"]);
    let command = "edit-lesson";
    if parsed.preamble.is_empty() {
        return Err(ParseError::InvalidFormat(usage(command)));
    }

    let edit = LessonEdit {
        class_name: parsed.optional("c/", command)?.map(str::to_string),
        day: parsed.optional("d/", command)?.map(day).transpose()?,
        time: parsed.optional("s/", command)?.map(time_range).transpose()?,
        tutor_id: parsed.optional("tu/", command)?.map(person_id).transpose()?,
        tags: parsed.tags(),
    };
    Ok(DirectCommand::EditLesson {
        class_name: parsed.preamble,
        edit,
    }
    .into())
}

/// A preamble is an index when it is all digits, otherwise an id
fn person_ref(preamble: &str, command: &str) -> Result<PersonRef> {
    if preamble.is_empty() {
        return Err(ParseError::InvalidFormat(usage(command)));
    }
    if preamble.chars().all(|c| c.is_ascii_digit()) {
        return preamble
            .parse::<usize>()
            .map(PersonRef::Index)
            .map_err(|_| {
                ParseError::InvalidValue("The person index provided is invalid".to_string())
            });
    }
    person_id(preamble).map(PersonRef::Id)
}

fn person_id(raw: &str) -> Result<PersonId> {
    PersonId::parse(raw).map_err(|e| ParseError::InvalidValue(e.to_string()))
}

fn day(raw: &str) -> Result<Day> {
    Day::parse(raw)
        .ok_or_else(|| ParseError::InvalidValue(format!("Unknown day '{}'", raw)))
}

fn time_range(raw: &str) -> Result<TimeRange> {
    TimeRange::parse(raw).map_err(|e| ParseError::InvalidValue(e.to_string()))
}

fn date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ParseError::InvalidValue(format!("Invalid date '{}': expected YYYY-MM-DD", raw))
    })
}
