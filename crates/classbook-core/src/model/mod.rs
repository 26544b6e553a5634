pub mod ids;
pub mod lesson;
pub mod person;

pub use ids::{IdGenerator, InvalidPersonId, PersonId};
pub use lesson::{Day, InvalidTimeRange, Lesson, LessonDetails, LessonEdit, TimeRange};
pub use person::{Person, PersonDetails, PersonEdit, Role};
