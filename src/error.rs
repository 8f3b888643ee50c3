//! Error taxonomy shared by every client operation.
//!
//! DESIGN
//! ======
//! `ApiError` is a single struct tagged with an [`ErrorKind`] rather than one
//! enum variant per failure site. UI callers branch on the kind; the message
//! is developer-oriented and never promised to be end-user phrasing.
//!
//! Backend error bodies look like `{ "code"?, "error"?, "message"? }`. The
//! code wins over the HTTP status when both are present.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Uniform result of every `NetworkClient` operation.
pub type RequestOutcome<T> = Result<T, ApiError>;

// =============================================================================
// ERROR KIND
// =============================================================================

/// Failure category reported to UI callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller arguments failed local validation. Never reaches the network.
    InvalidInput,
    /// The backend reports the referenced entity does not exist.
    NotFound,
    /// The backend rejected a state precondition (duplicate, wrong status).
    Conflict,
    /// Connection error, unreadable response body, or timeout.
    NetworkFailure,
    /// The backend answered with an unrecognized or internal failure, or a
    /// payload that does not match the data model.
    BackendError,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::NetworkFailure => "network_failure",
            Self::BackendError => "backend_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// API ERROR
// =============================================================================

/// Failure half of a [`RequestOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    timed_out: bool,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), status: None, timed_out: false }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkFailure, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendError, message)
    }

    /// Network failure raised when the request outlived its deadline.
    #[must_use]
    pub fn timeout(after: Duration) -> Self {
        Self::timed_out(format!("request timed out after {}ms", after.as_millis()))
    }

    /// Network failure for a timeout reported below the request deadline,
    /// such as an expired connect timeout.
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self {
            timed_out: true,
            ..Self::network(message)
        }
    }

    /// Classify a non-success HTTP response.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default();
        let kind = parsed
            .code
            .as_deref()
            .and_then(kind_from_code)
            .unwrap_or_else(|| kind_from_status(status));
        let message = parsed
            .error
            .or(parsed.message)
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self { kind, message, status: Some(status), timed_out: false }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the backend response, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }

    /// Grepable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidInput => "E_INVALID_INPUT",
            ErrorKind::NotFound => "E_NOT_FOUND",
            ErrorKind::Conflict => "E_CONFLICT",
            ErrorKind::NetworkFailure if self.timed_out => "E_TIMEOUT",
            ErrorKind::NetworkFailure => "E_NETWORK",
            ErrorKind::BackendError => "E_BACKEND",
        }
    }

    /// Whether repeating the same request could plausibly succeed.
    /// The client never retries on its own.
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self.kind {
            ErrorKind::NetworkFailure => true,
            ErrorKind::BackendError => matches!(self.status, Some(429 | 500..=599)),
            ErrorKind::InvalidInput | ErrorKind::NotFound | ErrorKind::Conflict => false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

fn kind_from_code(code: &str) -> Option<ErrorKind> {
    match code.to_ascii_uppercase().as_str() {
        "NOT_FOUND" => Some(ErrorKind::NotFound),
        "CONFLICT" | "INVALID_STATE" | "DUPLICATE" => Some(ErrorKind::Conflict),
        _ => None,
    }
}

fn kind_from_status(status: u16) -> ErrorKind {
    match status {
        404 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        _ => ErrorKind::BackendError,
    }
}

// =============================================================================
// CONFIG ERROR
// =============================================================================

/// Malformed client configuration. Fails construction instead of surfacing
/// through a `RequestOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("unsupported base URL scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
