//! `NetworkClient`: typed operations against the game/balance backend.
//!
//! DESIGN
//! ======
//! Each public operation does three things in order:
//! 1. Validate arguments locally. Failure returns `InvalidInput` before any I/O.
//! 2. Perform exactly one HTTP exchange through [`Transport`], bounded by the
//!    configured request timeout. Expiry drops the in-flight future, so a late
//!    response cannot change the outcome.
//! 3. Decode the body in two steps: bytes to JSON (`NetworkFailure` on
//!    garbage), JSON to DTO to domain snapshot (`BackendError` on mismatch).
//!
//! The client keeps only immutable config and its transport. Share it behind
//! an `Arc` for concurrent callers.

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, RequestOutcome};
use crate::transport::{HttpRequest, Method, ReqwestTransport, Transport, TransportError};
use crate::types::{
    Balance, BalanceDto, CreateGameBody, GameDto, GameSession, GameStatus, HealthReport, JoinGameBody, JoinGameDto,
    NetworkStatus, NewGame, SubmitResultBody,
};

pub struct NetworkClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl NetworkClient<ReqwestTransport> {
    /// Build a client backed by `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.connect_timeout())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Build a client from `ARENA_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is malformed or the HTTP
    /// client fails to build.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> NetworkClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // BALANCE
    // =========================================================================

    /// Fetch the current balance of `owner_id`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank owner, `NotFound` for an unknown owner,
    /// `NetworkFailure` on transport errors or timeout.
    pub async fn get_balance(&self, owner_id: &str) -> RequestOutcome<Balance> {
        let owner_id = validate_id("owner id", owner_id)?;
        let value = self.execute(Method::Get, &["api", "balance", owner_id], None).await?;
        let dto: BalanceDto = decode(value)?;
        dto.into_domain(owner_id).map_err(ApiError::backend)
    }

    // =========================================================================
    // GAMES
    // =========================================================================

    /// Create a game for `participant_ids`, in seat order.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty list or blank id, `Conflict` when the
    /// backend rejects a duplicate, `NetworkFailure` on transport errors.
    pub async fn create_game<S: AsRef<str>>(&self, participant_ids: &[S]) -> RequestOutcome<GameSession> {
        self.create_game_with(NewGame::new(participant_ids)).await
    }

    /// Create a game with an optional stake and room code.
    ///
    /// # Errors
    ///
    /// Same as [`NetworkClient::create_game`], plus `InvalidInput` for a
    /// blank room code.
    pub async fn create_game_with(&self, game: NewGame) -> RequestOutcome<GameSession> {
        if game.participants.is_empty() {
            return Err(ApiError::invalid_input("participant list must not be empty"));
        }
        for participant in &game.participants {
            validate_id("participant id", participant)?;
        }
        if let Some(code) = &game.room_code {
            validate_id("room code", code)?;
        }

        let body = CreateGameBody {
            participants: &game.participants,
            stake: game.stake,
            room_code: game.room_code.as_deref(),
        };
        let value = self
            .execute(Method::Post, &["api", "games"], Some(encode(&body)?))
            .await?;
        let session = decode_game(value)?;

        if !matches!(session.status(), GameStatus::Pending | GameStatus::Active) {
            return Err(ApiError::backend(format!(
                "new game `{}` reported status {}",
                session.id(),
                session.status()
            )));
        }
        if session.participants() != game.participants.as_slice() {
            return Err(ApiError::backend(format!(
                "new game `{}` participants {:?} differ from requested {:?}",
                session.id(),
                session.participants(),
                game.participants
            )));
        }
        Ok(session)
    }

    /// Fetch the current state of a session.
    ///
    /// # Errors
    ///
    /// `NotFound` if the session does not exist, `NetworkFailure` on
    /// transport errors.
    pub async fn get_game(&self, session_id: &str) -> RequestOutcome<GameSession> {
        let session_id = validate_id("session id", session_id)?;
        let value = self.execute(Method::Get, &["api", "games", session_id], None).await?;
        decode_game(value)
    }

    /// List games that are waiting for an opponent.
    ///
    /// # Errors
    ///
    /// `BackendError` if any listed game fails validation.
    pub async fn open_games(&self) -> RequestOutcome<Vec<GameSession>> {
        let value = self.execute(Method::Get, &["api", "games"], None).await?;
        let dtos: Vec<GameDto> = decode(value)?;
        dtos.into_iter()
            .map(|dto| dto.into_domain().map_err(ApiError::backend))
            .collect()
    }

    /// Join `player_id` to a game, addressed by session id or room code.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown game, `Conflict` if the game cannot be
    /// joined in its current state.
    pub async fn join_game(&self, session_or_room: &str, player_id: &str) -> RequestOutcome<GameSession> {
        let target = validate_id("session id or room code", session_or_room)?;
        let player_id = validate_id("player id", player_id)?;
        let body = JoinGameBody { player_id };
        let value = self
            .execute(Method::Post, &["api", "games", target, "join"], Some(encode(&body)?))
            .await?;
        let dto: JoinGameDto = decode(value)?;
        dto.into_game().into_domain().map_err(ApiError::backend)
    }

    /// Report the outcome of a finished game. The backend only accepts
    /// results for sessions it considers active.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a null payload, `Conflict` if the session is not in
    /// a state that accepts results, `NotFound` for an unknown session.
    pub async fn submit_result(&self, session_id: &str, payload: Value) -> RequestOutcome<GameSession> {
        let session_id = validate_id("session id", session_id)?;
        if payload.is_null() {
            return Err(ApiError::invalid_input("result payload must not be null"));
        }
        let body = SubmitResultBody { result: &payload };
        let value = self
            .execute(Method::Post, &["api", "games", session_id, "result"], Some(encode(&body)?))
            .await?;
        decode_game(value)
    }

    /// Cancel a game that has not started.
    ///
    /// # Errors
    ///
    /// `Conflict` if the game already started, `NotFound` for an unknown
    /// session.
    pub async fn cancel_game(&self, session_id: &str) -> RequestOutcome<GameSession> {
        let session_id = validate_id("session id", session_id)?;
        let value = self
            .execute(Method::Post, &["api", "games", session_id, "cancel"], None)
            .await?;
        decode_game(value)
    }

    // =========================================================================
    // SERVICE
    // =========================================================================

    /// Backend liveness probe.
    ///
    /// # Errors
    ///
    /// `NetworkFailure` if the backend is unreachable.
    pub async fn health(&self) -> RequestOutcome<HealthReport> {
        let value = self.execute(Method::Get, &["api", "health"], None).await?;
        decode(value)
    }

    /// State of the ledger node behind the backend.
    ///
    /// # Errors
    ///
    /// `NetworkFailure` if the backend is unreachable.
    pub async fn network_status(&self) -> RequestOutcome<NetworkStatus> {
        let value = self.execute(Method::Get, &["api", "linera", "status"], None).await?;
        decode(value)
    }

    // =========================================================================
    // EXCHANGE
    // =========================================================================

    async fn execute(&self, method: Method, segments: &[&str], body: Option<Value>) -> RequestOutcome<Value> {
        let url = self.config.endpoint(segments);
        let request_id = Uuid::new_v4();
        let timeout = self.config.request_timeout();
        tracing::debug!(%request_id, method = method.as_str(), %url, "sending request");

        let request = HttpRequest { method, url, body, request_id };
        let response = match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Ok(Ok(response)) => response,
            Err(_) => {
                tracing::warn!(%request_id, ?timeout, "request timed out");
                return Err(ApiError::timeout(timeout));
            }
            Ok(Err(e @ TransportError::Timeout)) => {
                tracing::warn!(%request_id, error = %e, "transport timed out");
                return Err(ApiError::timed_out(e.to_string()));
            }
            Ok(Err(e)) => {
                tracing::warn!(%request_id, error = %e, "transport failure");
                return Err(ApiError::network(e.to_string()));
            }
        };

        if !response.is_success() {
            let err = ApiError::from_response(response.status, &response.body);
            tracing::debug!(%request_id, status = response.status, code = err.error_code(), "backend rejected request");
            return Err(err);
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|e| {
            tracing::warn!(%request_id, error = %e, "malformed response body");
            ApiError::network(format!("malformed response body: {e}"))
        })
    }
}

/// Reject blank ids and the `.`/`..` segments URL joining would swallow.
fn validate_id<'a>(what: &str, id: &'a str) -> RequestOutcome<&'a str> {
    if id.trim().is_empty() {
        return Err(ApiError::invalid_input(format!("{what} must not be empty")));
    }
    if id == "." || id == ".." {
        return Err(ApiError::invalid_input(format!("{what} `{id}` is not a valid identifier")));
    }
    Ok(id)
}

fn encode<B: serde::Serialize>(body: &B) -> RequestOutcome<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::invalid_input(format!("request body not serializable: {e}")))
}

fn decode<D: DeserializeOwned>(value: Value) -> RequestOutcome<D> {
    serde_json::from_value(value).map_err(|e| ApiError::backend(format!("unexpected response shape: {e}")))
}

fn decode_game(value: Value) -> RequestOutcome<GameSession> {
    let dto: GameDto = decode(value)?;
    dto.into_domain().map_err(ApiError::backend)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
