use tracing::debug;

use classbook_core_types::Sensitive;

use super::{cascade, store::Store};
use crate::errors::{ClassbookError, Result};
use crate::model::{Person, PersonDetails, PersonEdit};

/// Add a new person, assigning the next id for their role
///
/// # Arguments
/// * `store` - Mutable reference to the Store
/// * `details` - Name, role and contact details of the new person
///
/// # Returns
/// The person as stored
///
/// # Errors
/// * `ValidationFailed` - If the name is empty or whitespace-only
/// * `DuplicateEntity` - If an identity-equal person already exists
pub fn add_person(store: &mut Store, details: PersonDetails) -> Result<Person> {
    if details.name.trim().is_empty() {
        return Err(ClassbookError::validation(
            "Name cannot be empty or whitespace-only",
        ));
    }

    let person = Person::new(store.next_person_id(details.role), details);
    store.add_person(person.clone())?;

    debug!(
        person_id = %person.id,
        role = %person.role,
        phone = %Sensitive::new(&person.phone),
        email = %Sensitive::new(&person.email),
        "person added"
    );
    Ok(person)
}

/// Apply `edit` to `target`
///
/// Lessons only hold student ids, and an edit never changes the id, so no
/// cascade is needed.
///
/// # Errors
/// * `ValidationFailed` - If nothing would change, or the new name is empty
/// * `EntityNotFound` - If `target` is not in the store
/// * `DuplicateEntity` - If the edit collides with another person
pub fn edit_person(store: &mut Store, target: &Person, edit: &PersonEdit) -> Result<Person> {
    if edit.is_empty() {
        return Err(ClassbookError::validation(
            "At least one field to edit must be provided",
        ));
    }
    if edit.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ClassbookError::validation(
            "Name cannot be empty or whitespace-only",
        ));
    }

    let edited = target.with_edit(edit);
    store.set_person(target, edited.clone())?;

    debug!(person_id = %edited.id, "person edited");
    Ok(edited)
}

/// Check that `person` may be deleted
///
/// A tutor who still teaches a lesson cannot be deleted: the lesson would be
/// left naming a tutor that does not exist.
///
/// # Errors
/// * `ValidationFailed` - If `person` is a tutor of at least one lesson
pub fn ensure_deletable(store: &Store, person: &Person) -> Result<()> {
    let taught: Vec<&str> = store
        .lessons()
        .iter()
        .filter(|l| l.tutor_id == person.id)
        .map(|l| l.class_name.as_str())
        .collect();

    if !taught.is_empty() {
        return Err(ClassbookError::validation(format!(
            "{} ({}) still teaches {}; reassign or delete those lessons first",
            person.name,
            person.id,
            taught.join(", ")
        )));
    }
    Ok(())
}

/// Delete `target` and strip its id from every lesson
///
/// # Errors
/// * `ValidationFailed` - If `target` is a tutor still assigned to lessons
/// * `EntityNotFound` - If `target` is not in the store
pub fn delete_person(store: &mut Store, target: &Person) -> Result<()> {
    ensure_deletable(store, target)?;
    store.remove_person(target)?;
    let repaired = cascade::on_person_deleted(store, target)?;

    debug!(person_id = %target.id, lessons_repaired = repaired, "person deleted");
    Ok(())
}
