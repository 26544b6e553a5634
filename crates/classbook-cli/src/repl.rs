//! Read-eval-print loop
//!
//! Each line is parsed into a command and run through the session. While a
//! command waits for confirmation, every line is treated as the reply.

use std::io::{BufRead, Write};

use anyhow::Result;
use classbook_core::{CommandResult, Session, ViewHint};

use crate::parser::{self, Input, USAGE};

pub const WELCOME: &str = "Welcome to Classbook! Type 'help' to see all commands.";
pub const GOODBYE: &str = "Goodbye!";

/// Outcome of one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub output: String,
    pub exit: bool,
}

impl Step {
    fn show(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit: false,
        }
    }
}

/// Run until `exit` or end of input
///
/// # Errors
///
/// Fails only when reading input or writing output fails; command errors are
/// printed and the loop carries on.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "{}", WELCOME)?;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() && !session.has_pending_command() {
            continue;
        }
        let step = handle_line(session, &line);
        if !step.output.is_empty() {
            writeln!(out, "{}", step.output)?;
        }
        if step.exit {
            break;
        }
    }
    out.flush()?;
    Ok(())
}

/// Process a single line against `session`
pub fn handle_line(session: &mut Session, line: &str) -> Step {
    if session.has_pending_command() {
        return match session.respond(line) {
            Ok(result) => Step::show(render(session, &result)),
            Err(e) => Step::show(e.to_string()),
        };
    }

    match parser::parse(line) {
        Err(e) => Step::show(e.to_string()),
        Ok(Input::Help) => Step::show(help()),
        Ok(Input::Exit) => Step {
            output: GOODBYE.to_string(),
            exit: true,
        },
        Ok(Input::Command(command)) => match session.execute(command) {
            Ok(result) => Step::show(render(session, &result)),
            Err(e) => Step::show(e.to_string()),
        },
    }
}

fn help() -> String {
    let mut text = String::from("Commands:");
    for (_, usage) in USAGE {
        text.push_str("\n  ");
        text.push_str(usage);
    }
    text
}

/// Feedback followed by the list the command brought into view
fn render(session: &Session, result: &CommandResult) -> String {
    let mut text = result.feedback.clone();
    match result.hint {
        Some(ViewHint::Persons) => {
            for (i, person) in session.visible_persons().iter().enumerate() {
                let lessons: Vec<&str> = person
                    .lessons
                    .iter()
                    .map(|l| l.class_name.as_str())
                    .collect();
                text.push_str(&format!(
                    "\n{}. {} ({}) {} | {} | {} | {}",
                    i + 1,
                    person.name,
                    person.id,
                    person.role,
                    person.phone,
                    person.email,
                    person.address
                ));
                if !person.tags.is_empty() {
                    let tags: Vec<&str> = person.tags.iter().map(String::as_str).collect();
                    text.push_str(&format!(" | tags: {}", tags.join(", ")));
                }
                if !lessons.is_empty() {
                    text.push_str(&format!(" | lessons: {}", lessons.join(", ")));
                }
            }
        }
        Some(ViewHint::Lessons) => {
            for lesson in session.store().lessons() {
                let students: Vec<String> =
                    lesson.students.iter().map(|id| id.to_string()).collect();
                text.push_str(&format!(
                    "\n{} {} {} | tutor {} | students: {}",
                    lesson.class_name,
                    lesson.day,
                    lesson.time,
                    lesson.tutor_id,
                    if students.is_empty() {
                        "none".to_string()
                    } else {
                        students.join(", ")
                    }
                ));
            }
        }
        None => {}
    }
    text
}
