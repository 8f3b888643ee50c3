use super::*;

#[test]
fn from_response_maps_404_to_not_found() {
    let err = ApiError::from_response(404, br#"{"error":"Game not found"}"#);
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "Game not found");
    assert_eq!(err.status(), Some(404));
}

#[test]
fn from_response_maps_409_to_conflict() {
    let err = ApiError::from_response(409, br#"{"message":"game is not active"}"#);
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "game is not active");
}

#[test]
fn from_response_code_overrides_status() {
    let err = ApiError::from_response(400, br#"{"code":"invalid_state","error":"game already completed"}"#);
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = ApiError::from_response(500, br#"{"code":"NOT_FOUND","error":"no such chain"}"#);
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn from_response_unknown_code_falls_back_to_status() {
    let err = ApiError::from_response(409, br#"{"code":"E_WHATEVER"}"#);
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn from_response_non_json_body_uses_status_message() {
    let err = ApiError::from_response(502, b"<html>Bad Gateway</html>");
    assert_eq!(err.kind(), ErrorKind::BackendError);
    assert_eq!(err.message(), "request failed with status 502");
}

#[test]
fn error_field_preferred_over_message() {
    let err = ApiError::from_response(500, br#"{"error":"boom","message":"ignored"}"#);
    assert_eq!(err.message(), "boom");
}

#[test]
fn timeout_is_network_failure() {
    let err = ApiError::timeout(Duration::from_millis(250));
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert!(err.is_timeout());
    assert_eq!(err.error_code(), "E_TIMEOUT");
    assert!(err.message().contains("250ms"));
}

#[test]
fn transport_timeout_keeps_its_own_message() {
    let err = ApiError::timed_out("connect timed out");
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert!(err.is_timeout());
    assert!(err.retryable());
    assert_eq!(err.message(), "connect timed out");
}

#[test]
fn retryable_flags() {
    assert!(ApiError::network("reset").retryable());
    assert!(ApiError::from_response(503, b"").retryable());
    assert!(ApiError::from_response(429, b"").retryable());
    assert!(!ApiError::from_response(400, b"").retryable());
    assert!(!ApiError::from_response(404, b"").retryable());
    assert!(!ApiError::invalid_input("empty").retryable());
}

#[test]
fn display_includes_kind_and_message() {
    let err = ApiError::invalid_input("owner id must not be empty");
    assert_eq!(err.to_string(), "invalid_input: owner id must not be empty");
}
