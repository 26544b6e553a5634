use crate::errors::{ClassbookError, EntityKind, Result};
use crate::model::{IdGenerator, Lesson, Person, PersonId, Role};

/// In-memory record store for persons and lessons
///
/// A dumb, invariant-checked container: it enforces identity uniqueness in
/// both collections and nothing else. Cross-reference repair lives in
/// `ops::cascade`. Not thread-safe - the session owns it exclusively.
///
/// Both collections keep insertion order, which is the order lists are shown
/// in and the order 1-based indices refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    persons: Vec<Person>,
    lessons: Vec<Lesson>,
    ids: IdGenerator,
}

impl Store {
    pub fn new() -> Self {
        Self {
            persons: Vec::new(),
            lessons: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    /// All persons, in insertion order
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// All lessons, in insertion order
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Check whether an identity-equal person is present
    pub fn has_person(&self, person: &Person) -> bool {
        self.persons.iter().any(|p| p.is_same_person(person))
    }

    /// Check whether a lesson with the same class name is present
    pub fn has_lesson(&self, lesson: &Lesson) -> bool {
        self.lessons.iter().any(|l| l.is_same_lesson(lesson))
    }

    pub fn person_by_id(&self, id: &PersonId) -> Option<&Person> {
        self.persons.iter().find(|p| &p.id == id)
    }

    pub fn lesson_by_name(&self, class_name: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.class_name == class_name)
    }

    /// The id the next added person of `role` should carry
    ///
    /// Nothing is reserved until a person with that id is actually added.
    pub fn next_person_id(&self, role: Role) -> PersonId {
        self.ids.peek(role)
    }

    /// The owned id sequence
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Retire `id` and every lower id of the same role without adding anyone
    ///
    /// Used when hydrating a store whose highest ids belonged to persons that
    /// were deleted before it was saved.
    pub fn retire_id(&mut self, id: &PersonId) {
        self.ids.observe(id);
    }

    /// Add a person
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntity` if an identity-equal person, or a person with
    /// the same id, is already present.
    pub fn add_person(&mut self, person: Person) -> Result<()> {
        if self.has_person(&person) {
            return Err(duplicate_person(&person));
        }
        if self.person_by_id(&person.id).is_some() {
            return Err(ClassbookError::DuplicateEntity {
                entity: EntityKind::Person,
                key: person.id.to_string(),
            });
        }

        self.ids.observe(&person.id);
        self.persons.push(person);
        Ok(())
    }

    /// Add a lesson
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntity` if a lesson with the same class name exists.
    pub fn add_lesson(&mut self, lesson: Lesson) -> Result<()> {
        if self.has_lesson(&lesson) {
            return Err(duplicate_lesson(&lesson));
        }
        self.lessons.push(lesson);
        Ok(())
    }

    /// Swap `target` for `edited` at `target`'s identity slot
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if `target` is absent by identity, or
    /// `DuplicateEntity` if `edited` is identity-equal to a different person.
    pub fn set_person(&mut self, target: &Person, edited: Person) -> Result<()> {
        let index = self
            .persons
            .iter()
            .position(|p| p.is_same_person(target))
            .ok_or_else(|| missing_person(target))?;

        let collides = self
            .persons
            .iter()
            .enumerate()
            .any(|(i, p)| i != index && (p.is_same_person(&edited) || p.id == edited.id));
        if collides {
            return Err(duplicate_person(&edited));
        }

        self.persons[index] = edited;
        Ok(())
    }

    /// Swap `target` for `edited` at `target`'s identity slot
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if no lesson is named like `target`, or
    /// `DuplicateEntity` if `edited` takes the class name of another lesson.
    pub fn set_lesson(&mut self, target: &Lesson, edited: Lesson) -> Result<()> {
        let index = self
            .lessons
            .iter()
            .position(|l| l.is_same_lesson(target))
            .ok_or_else(|| missing_lesson(target))?;

        let collides = self
            .lessons
            .iter()
            .enumerate()
            .any(|(i, l)| i != index && l.is_same_lesson(&edited));
        if collides {
            return Err(duplicate_lesson(&edited));
        }

        self.lessons[index] = edited;
        Ok(())
    }

    /// Remove the person identity-equal to `target`
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if no such person is present.
    pub fn remove_person(&mut self, target: &Person) -> Result<()> {
        let index = self
            .persons
            .iter()
            .position(|p| p.is_same_person(target))
            .ok_or_else(|| missing_person(target))?;
        self.persons.remove(index);
        Ok(())
    }

    /// Remove the lesson named like `target`
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if no such lesson is present.
    pub fn remove_lesson(&mut self, target: &Lesson) -> Result<()> {
        let index = self
            .lessons
            .iter()
            .position(|l| l.is_same_lesson(target))
            .ok_or_else(|| missing_lesson(target))?;
        self.lessons.remove(index);
        Ok(())
    }

    /// Replace the whole contents with `snapshot` (undo/redo)
    pub fn reset_data(&mut self, snapshot: Store) {
        *self = snapshot;
    }

    /// Drop every person and lesson; ids already handed out stay retired
    pub fn clear(&mut self) {
        self.persons.clear();
        self.lessons.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.lessons.is_empty()
    }
}

fn duplicate_person(person: &Person) -> ClassbookError {
    ClassbookError::DuplicateEntity {
        entity: EntityKind::Person,
        key: person.name.clone(),
    }
}

fn duplicate_lesson(lesson: &Lesson) -> ClassbookError {
    ClassbookError::DuplicateEntity {
        entity: EntityKind::Lesson,
        key: lesson.class_name.clone(),
    }
}

fn missing_person(person: &Person) -> ClassbookError {
    ClassbookError::EntityNotFound {
        entity: EntityKind::Person,
        key: person.id.to_string(),
    }
}

fn missing_lesson(lesson: &Lesson) -> ClassbookError {
    ClassbookError::EntityNotFound {
        entity: EntityKind::Lesson,
        key: lesson.class_name.clone(),
    }
}
