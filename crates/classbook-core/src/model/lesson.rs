use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::PersonId;

/// Day of the week a lesson runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Parse a full or three-letter day name (case-insensitive)
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        let day = match lowered.as_str() {
            "monday" | "mon" => Day::Monday,
            "tuesday" | "tue" => Day::Tuesday,
            "wednesday" | "wed" => Day::Wednesday,
            "thursday" | "thu" => Day::Thursday,
            "friday" | "fri" => Day::Friday,
            "saturday" | "sat" => Day::Saturday,
            "sunday" | "sun" => Day::Sunday,
            _ => return None,
        };
        Some(day)
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time range '{0}': expected HHMM-HHMM with the start before the end")]
pub struct InvalidTimeRange(pub String);

/// Start and end of a lesson on its day; `start` is strictly before `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// # Errors
    ///
    /// Returns `InvalidTimeRange` if `start` is not before `end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, InvalidTimeRange> {
        if start >= end {
            return Err(InvalidTimeRange(format!(
                "{}-{}",
                start.format("%H%M"),
                end.format("%H%M")
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse `HHMM-HHMM`, e.g. `1200-1400`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimeRange` for malformed times or an empty range.
    pub fn parse(raw: &str) -> Result<Self, InvalidTimeRange> {
        let invalid = || InvalidTimeRange(raw.to_string());
        let (start, end) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H%M").map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H%M").map_err(|_| invalid())?;
        Self::new(start, end).map_err(|_| invalid())
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H%M"), self.end.format("%H%M"))
    }
}

impl TryFrom<String> for TimeRange {
    type Error = InvalidTimeRange;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

/// Everything needed to create a lesson; a new lesson has no students
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDetails {
    pub class_name: String,
    pub day: Day,
    pub time: TimeRange,
    pub tutor_id: PersonId,
    pub tags: BTreeSet<String>,
}

/// Field-wise edit of an existing lesson; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonEdit {
    pub class_name: Option<String>,
    pub day: Option<Day>,
    pub time: Option<TimeRange>,
    pub tutor_id: Option<PersonId>,
    pub tags: Option<BTreeSet<String>>,
}

impl LessonEdit {
    pub fn is_empty(&self) -> bool {
        self.class_name.is_none()
            && self.day.is_none()
            && self.time.is_none()
            && self.tutor_id.is_none()
            && self.tags.is_none()
    }
}

/// A weekly class, keyed by its class name
///
/// Students are held by id only. `attendance` maps a calendar date to the
/// students marked present that day and only ever names enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Lesson {
    pub class_name: String,
    pub day: Day,
    pub time: TimeRange,
    pub tutor_id: PersonId,
    pub students: BTreeSet<PersonId>,
    pub attendance: BTreeMap<NaiveDate, BTreeSet<PersonId>>,
    pub tags: BTreeSet<String>,
}

impl Lesson {
    pub fn new(details: LessonDetails) -> Self {
        Self {
            class_name: details.class_name,
            day: details.day,
            time: details.time,
            tutor_id: details.tutor_id,
            students: BTreeSet::new(),
            attendance: BTreeMap::new(),
            tags: details.tags,
        }
    }

    /// Identity equality: same class name
    pub fn is_same_lesson(&self, other: &Lesson) -> bool {
        self.class_name == other.class_name
    }

    pub fn has_student(&self, id: &PersonId) -> bool {
        self.students.contains(id)
    }

    pub fn is_present(&self, id: &PersonId, date: NaiveDate) -> bool {
        self.attendance
            .get(&date)
            .is_some_and(|present| present.contains(id))
    }

    /// Copy of this lesson with `edit` applied; enrolment and attendance are kept
    pub fn with_edit(&self, edit: &LessonEdit) -> Lesson {
        let mut edited = self.clone();
        if let Some(class_name) = &edit.class_name {
            edited.class_name = class_name.clone();
        }
        if let Some(day) = edit.day {
            edited.day = day;
        }
        if let Some(time) = edit.time {
            edited.time = time;
        }
        if let Some(tutor_id) = &edit.tutor_id {
            edited.tutor_id = tutor_id.clone();
        }
        if let Some(tags) = &edit.tags {
            edited.tags = tags.clone();
        }
        edited
    }

    pub fn with_student(&self, id: PersonId) -> Lesson {
        let mut edited = self.clone();
        edited.students.insert(id);
        edited
    }

    /// Copy of this lesson without `id`, including its attendance marks
    pub fn without_student(&self, id: &PersonId) -> Lesson {
        let mut edited = self.clone();
        edited.students.remove(id);
        for present in edited.attendance.values_mut() {
            present.remove(id);
        }
        edited.attendance.retain(|_, present| !present.is_empty());
        edited
    }

    pub fn with_attendance(&self, id: PersonId, date: NaiveDate) -> Lesson {
        let mut edited = self.clone();
        edited.attendance.entry(date).or_default().insert(id);
        edited
    }

    pub fn without_attendance(&self, id: &PersonId, date: NaiveDate) -> Lesson {
        let mut edited = self.clone();
        if let Some(present) = edited.attendance.get_mut(&date) {
            present.remove(id);
            if present.is_empty() {
                edited.attendance.remove(&date);
            }
        }
        edited
    }
}
