use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::person::Role;

/// Role-prefixed person identifier (`S<n>` for students, `T<n>` for tutors)
///
/// The prefix always agrees with the person's role, so an id alone is enough
/// to tell whether it may appear in a lesson's student set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonId {
    role: Role,
    number: u32,
}

/// A string that is not a well-formed person identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid person id '{0}': expected S<number> or T<number>")]
pub struct InvalidPersonId(pub String);

impl PersonId {
    pub fn new(role: Role, number: u32) -> Self {
        Self { role, number }
    }

    /// Parse an id such as `S12` or `t3` (prefix is case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `InvalidPersonId` if the prefix is unknown or the number is
    /// missing, zero, or not numeric.
    pub fn parse(raw: &str) -> Result<Self, InvalidPersonId> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        let role = match chars.next() {
            Some('S') | Some('s') => Role::Student,
            Some('T') | Some('t') => Role::Tutor,
            _ => return Err(InvalidPersonId(raw.to_string())),
        };

        let number: u32 = chars
            .as_str()
            .parse()
            .map_err(|_| InvalidPersonId(raw.to_string()))?;
        if number == 0 {
            return Err(InvalidPersonId(raw.to_string()));
        }

        Ok(Self { role, number })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn number(&self) -> u32 {
        self.number
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.role.prefix(), self.number)
    }
}

impl TryFrom<String> for PersonId {
    type Error = InvalidPersonId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PersonId> for String {
    fn from(id: PersonId) -> Self {
        id.to_string()
    }
}

/// Per-role sequence that hands out person identifiers
///
/// Owned by the record store, so every snapshot in the undo log carries the
/// counter values that were live at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next_student: u32,
    next_tutor: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            next_student: 1,
            next_tutor: 1,
        }
    }

    /// The id the next person of `role` would receive, without reserving it
    pub fn peek(&self, role: Role) -> PersonId {
        match role {
            Role::Student => PersonId::new(role, self.next_student),
            Role::Tutor => PersonId::new(role, self.next_tutor),
        }
    }

    /// Make sure `id` (and everything below it) is never handed out again
    pub fn observe(&mut self, id: &PersonId) {
        let next = id.number().saturating_add(1);
        match id.role() {
            Role::Student => self.next_student = self.next_student.max(next),
            Role::Tutor => self.next_tutor = self.next_tutor.max(next),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
