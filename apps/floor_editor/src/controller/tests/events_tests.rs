use super::*;
use warehouse_core::{CallKind, ValidationError};

#[test]
fn connect_failures_get_actionable_hints() {
    assert_eq!(
        classify_connect_failure("failed to connect to inventory service: connection refused"),
        "Inventory service unreachable; check the server URL and retry connect."
    );
    assert_eq!(
        classify_connect_failure("inventory service answered 500"),
        "Inventory service error: inventory service answered 500"
    );
}

#[test]
fn session_errors_keep_their_family() {
    let validation = UiError::from_session(&SessionError::Validation(ValidationError::NoSelection));
    assert_eq!(validation.category(), UiErrorCategory::Validation);
    assert_eq!(validation.context(), UiErrorContext::Command);
    assert_eq!(validation.prompt_line(), "! select at least one cell first");

    let busy = UiError::from_session(&SessionError::ConcurrentOperationRejected(
        CallKind::SimulationRun,
    ));
    assert_eq!(busy.category(), UiErrorCategory::Busy);
    assert_eq!(
        busy.prompt_line(),
        "! busy: simulation run is already in progress"
    );
}

#[test]
fn remote_failures_are_classified_by_message() {
    let err = SessionError::RemoteCall {
        call: CallKind::Connect,
        message: "failed to connect to inventory service".to_string(),
    };
    let ui_error = UiError::from_session(&err);
    assert_eq!(ui_error.category(), UiErrorCategory::Transport);
    assert_eq!(ui_error.context(), UiErrorContext::ServiceCall);

    let err = SessionError::RemoteCall {
        call: CallKind::SimulationRun,
        message: "No path found.".to_string(),
    };
    assert_eq!(
        UiError::from_session(&err).category(),
        UiErrorCategory::Service
    );
}

#[test]
fn startup_failure_message_is_kept() {
    let err = UiError::from_message(
        UiErrorContext::BackendStartup,
        "backend worker startup failure: failed to build runtime",
    );
    assert_eq!(err.context(), UiErrorContext::BackendStartup);
    assert!(err.message().starts_with("backend worker startup failure"));
}
