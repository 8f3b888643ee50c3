use std::cell::Cell;

use arena_api::ErrorKind;

use super::*;

#[tokio::test(start_paused = true)]
async fn retries_retryable_failures_then_succeeds() {
    let calls = Cell::new(0_u32);
    let outcome = with_retries(3, || {
        calls.set(calls.get() + 1);
        let attempt = calls.get();
        async move {
            if attempt < 3 {
                Err(ApiError::network("connection reset"))
            } else {
                Ok(attempt)
            }
        }
    })
    .await;

    assert_eq!(outcome.unwrap(), 3);
    assert_eq!(calls.get(), 3);
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_configured_retries() {
    let calls = Cell::new(0_u32);
    let outcome: RequestOutcome<()> = with_retries(2, || {
        calls.set(calls.get() + 1);
        async { Err(ApiError::network("connection reset")) }
    })
    .await;

    assert_eq!(outcome.unwrap_err().kind(), ErrorKind::NetworkFailure);
    assert_eq!(calls.get(), 3);
}

#[tokio::test]
async fn does_not_retry_non_retryable_failures() {
    let calls = Cell::new(0_u32);
    let outcome: RequestOutcome<()> = with_retries(5, || {
        calls.set(calls.get() + 1);
        async { Err(ApiError::new(ErrorKind::Conflict, "game is not active")) }
    })
    .await;

    assert_eq!(outcome.unwrap_err().kind(), ErrorKind::Conflict);
    assert_eq!(calls.get(), 1);
}

#[test]
fn api_error_converts_with_code() {
    let err = CliError::from(ApiError::invalid_input("owner id must not be empty"));
    assert_eq!(
        err.to_string(),
        "request failed (E_INVALID_INPUT): invalid_input: owner id must not be empty"
    );
}
