//! Arena API: typed client for the staked-game and balance backend.
//!
//! ARCHITECTURE
//! ============
//! UI callers hold a [`NetworkClient`] and invoke one async operation per
//! backend endpoint. Every operation resolves to a [`RequestOutcome`]: either
//! a validated snapshot (`Balance`, `GameSession`, ...) or an [`ApiError`]
//! tagged with an [`ErrorKind`].
//!
//! DESIGN
//! ======
//! - Local validation runs before any I/O; `InvalidInput` never touches the wire.
//! - HTTP goes through the [`Transport`] trait so tests can script the backend.
//! - Wire DTOs are parsed and validated into the domain model at the boundary.
//!   Shape mismatches become `BackendError`, never silent pass-through.
//! - No retries. Callers read [`ApiError::retryable`] and decide.

pub mod client;
pub mod config;
pub mod error;
pub mod pending;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use client::NetworkClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, ErrorKind, RequestOutcome};
pub use pending::RequestHandle;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};
pub use types::{Amount, Balance, GameSession, GameStatus, HealthReport, NetworkStatus, NewGame};
