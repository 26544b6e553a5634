#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use classbook_core::errors::{ClassbookError, ExError, ExErrorKind};
use classbook_core::logging_facility::test_capture::{init_test_capture, CapturedEvent};
use classbook_core::{log_op_end, log_op_error, log_op_start, Role};
use classbook_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use common::*;

fn of_kind<'a>(events: &'a [CapturedEvent], event: &str) -> Vec<&'a CapturedEvent> {
    events
        .iter()
        .filter(|e| e.event.as_deref() == Some(event))
        .collect()
}

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for(op_name);
    let ends = of_kind(&events, EVENT_END);
    assert_eq!(ends.len(), 1, "Should have exactly one end event");
    assert_eq!(ends[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    log_op_error!(op_name, ClassbookError::NoPreviousState, duration_ms = 10);

    let events = capture.events_for(op_name);
    let errors = of_kind(&events, EVENT_END_ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("err.code"), Some("ERR_NO_PREVIOUS_STATE"));
    assert_eq!(errors[0].level, tracing::Level::WARN);
}

#[test]
fn test_error_conversion_preserves_context() {
    let capture = init_test_capture();
    let op_name = "test_error_conversion_unique_4";

    let err = ClassbookError::validation("Tutor T1 still teaches A1a");
    log_op_error!(op_name, err.clone(), duration_ms = 5);

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);

    let events = capture.events_for(op_name);
    let error_event = of_kind(&events, EVENT_END_ERROR)[0];
    assert_eq!(error_event.field("err.code"), Some("ERR_INVALID_INPUT"));
    assert_eq!(error_event.field("message"), Some("Tutor T1 still teaches A1a"));
}

#[test]
fn test_session_brackets_each_command_with_one_request_id() {
    // GIVEN a session with a tutor and a lesson
    let capture = init_test_capture();
    let mut session = session_on(roster_with_lesson());

    // WHEN a student is added
    session.execute(add_student("Logging Probe One")).unwrap();

    // THEN exactly one start and one end share a request id
    let end = capture
        .events_for("add_person")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .last()
        .expect("Should have an end event for add_person");
    let request_id = end.request_id.clone().expect("end event carries request_id");

    let bracket = capture.events_for_request(&request_id);
    assert_eq!(of_kind(&bracket, EVENT_START).len(), 1);
    assert_eq!(of_kind(&bracket, EVENT_END).len(), 1);
    assert!(of_kind(&bracket, EVENT_END_ERROR).is_empty());
}

#[test]
fn test_session_failure_logs_end_error_with_code() {
    // GIVEN a fresh session with nothing to undo
    let capture = init_test_capture();
    let mut session = session_on(roster());

    // WHEN undo is attempted
    let result = session.undo();

    // THEN the error is returned and logged under the undo op
    assert_eq!(result, Err(ClassbookError::NoPreviousState));
    let events = capture.events_for("undo");
    let errors = of_kind(&events, EVENT_END_ERROR);
    assert!(errors
        .iter()
        .any(|e| e.field("err.code") == Some("ERR_NO_PREVIOUS_STATE")));

    let request_id = errors[0].request_id.clone().unwrap();
    let bracket = capture.events_for_request(&request_id);
    assert_eq!(of_kind(&bracket, EVENT_START).len(), 1);
    assert!(of_kind(&bracket, EVENT_END).is_empty());
}

#[test]
fn test_confirmation_reply_logged_as_respond() {
    // GIVEN a pending lesson delete
    let capture = init_test_capture();
    let mut session = session_on(roster_with_lesson());
    session.execute(delete_lesson("A1a")).unwrap();

    // WHEN an invalid reply arrives
    let _ = session.respond("maybe");

    // THEN it is logged as a respond error with the gate's code
    let events = capture.events_for("respond");
    assert!(of_kind(&events, EVENT_END_ERROR)
        .iter()
        .any(|e| e.field("err.code") == Some("ERR_INVALID_RESPONSE")));
}

#[test]
fn test_contact_details_never_logged_in_clear() {
    // GIVEN a capture and a person with recognisable contact details
    let capture = init_test_capture();
    let mut session = session_on(roster());
    let mut details = person_details("Redaction Probe", Role::Student);
    details.phone = "99887766".to_string();
    details.email = "redaction.probe@example.com".to_string();

    // WHEN the person is added
    session
        .execute(classbook_core::Command::Direct(
            classbook_core::DirectCommand::AddPerson(details),
        ))
        .unwrap();

    // THEN no captured field contains the phone or email
    for event in capture.events() {
        for value in event.fields.values() {
            assert!(!value.contains("99887766"), "phone leaked: {:?}", event);
            assert!(!value.contains("redaction.probe@"), "email leaked: {:?}", event);
        }
    }
}
