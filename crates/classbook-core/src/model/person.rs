use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ids::PersonId;
use super::lesson::Lesson;

/// Whether a person attends lessons or teaches them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Tutor,
}

impl Role {
    /// Identifier prefix for this role
    pub fn prefix(&self) -> char {
        match self {
            Role::Student => 'S',
            Role::Tutor => 'T',
        }
    }

    /// Parse `student`/`tutor` (case-insensitive)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Role::Student),
            "tutor" => Some(Role::Tutor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Tutor => write!(f, "tutor"),
        }
    }
}

/// Everything needed to create a person except the identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDetails {
    pub name: String,
    pub role: Role,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tags: BTreeSet<String>,
}

/// Field-wise edit of an existing person; `None` keeps the current value
///
/// Role is not editable: it is baked into the identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonEdit {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tags: Option<BTreeSet<String>>,
}

impl PersonEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.tags.is_none()
    }
}

/// A student or tutor
///
/// `lessons` holds full copies of the lessons a student is enrolled in, not
/// references. Any change to a lesson leaves these copies stale until
/// `ops::cascade` swaps them out. Tutors never hold lesson copies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: Role,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tags: BTreeSet<String>,
    pub lessons: BTreeSet<Lesson>,
}

impl Person {
    pub fn new(id: PersonId, details: PersonDetails) -> Self {
        Self {
            id,
            name: details.name,
            role: details.role,
            phone: details.phone,
            email: details.email,
            address: details.address,
            tags: details.tags,
            lessons: BTreeSet::new(),
        }
    }

    /// Identity equality: same name, role, phone and email
    pub fn is_same_person(&self, other: &Person) -> bool {
        self.name == other.name
            && self.role == other.role
            && self.phone == other.phone
            && self.email == other.email
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_tutor(&self) -> bool {
        self.role == Role::Tutor
    }

    /// The embedded copy of the lesson called `class_name`, if held
    pub fn lesson_named(&self, class_name: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.class_name == class_name)
    }

    /// Copy of this person with `edit` applied; id and lessons are kept
    pub fn with_edit(&self, edit: &PersonEdit) -> Person {
        let mut edited = self.clone();
        if let Some(name) = &edit.name {
            edited.name = name.clone();
        }
        if let Some(phone) = &edit.phone {
            edited.phone = phone.clone();
        }
        if let Some(email) = &edit.email {
            edited.email = email.clone();
        }
        if let Some(address) = &edit.address {
            edited.address = address.clone();
        }
        if let Some(tags) = &edit.tags {
            edited.tags = tags.clone();
        }
        edited
    }

    /// Copy of this person that additionally holds `lesson`
    pub fn with_lesson(&self, lesson: Lesson) -> Person {
        let mut edited = self.without_lesson_named(&lesson.class_name);
        edited.lessons.insert(lesson);
        edited
    }

    /// Copy of this person without any lesson called `class_name`
    pub fn without_lesson_named(&self, class_name: &str) -> Person {
        let mut edited = self.clone();
        edited.lessons.retain(|l| l.class_name != class_name);
        edited
    }

    /// Copy of this person with the exact copy `old` swapped for `new`
    pub fn with_lesson_replaced(&self, old: &Lesson, new: Lesson) -> Person {
        let mut edited = self.clone();
        edited.lessons.remove(old);
        edited.lessons.insert(new);
        edited
    }
}
