//! Domain snapshots and the wire DTOs they are validated from.
//!
//! DESIGN
//! ======
//! The backend's JSON is loosely shaped: ids arrive as strings or numbers,
//! amounts as decimal strings or integers, and older payloads carry
//! `creator`/`opponent` instead of a participant list. Each payload is
//! deserialized into a private `*Dto`, then `into_domain` checks the
//! invariants and builds the public snapshot. A failed check yields a
//! schema message that the client reports as `BackendError`.
//!
//! Snapshots are read-only: fields are private and exposed through getters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

// =============================================================================
// AMOUNT
// =============================================================================

/// Non-negative token amount in the network's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "AmountRepr")]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u128 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("amount `{s}` is not a non-negative integer"));
        }
        trimmed
            .parse::<u128>()
            .map(Self)
            .map_err(|e| format!("amount `{s}` out of range: {e}"))
    }
}

/// Amounts go out as decimal strings so no precision is lost in JS callers.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Int(u64),
    Text(String),
}

impl TryFrom<AmountRepr> for Amount {
    type Error = String;

    fn try_from(repr: AmountRepr) -> Result<Self, Self::Error> {
        match repr {
            AmountRepr::Int(v) => Ok(Self(u128::from(v))),
            AmountRepr::Text(s) => s.parse(),
        }
    }
}

/// Id-like scalar the backend may send as a string or a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TextOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

// =============================================================================
// BALANCE
// =============================================================================

/// A player's holdings as of the fetch that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    owner: String,
    amount: Amount,
    locked: Amount,
}

impl Balance {
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Spendable amount.
    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Stake currently held in unfinished games.
    #[must_use]
    pub fn locked(&self) -> Amount {
        self.locked
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BalanceDto {
    owner: Option<String>,
    amount: Option<Amount>,
    available: Option<Amount>,
    locked: Option<Amount>,
}

impl BalanceDto {
    /// Build a [`Balance`] for `requested_owner`. The backend may omit the
    /// owner, but must not answer for somebody else.
    pub(crate) fn into_domain(self, requested_owner: &str) -> Result<Balance, String> {
        if let Some(owner) = &self.owner {
            if owner != requested_owner {
                return Err(format!("balance owner `{owner}` does not match requested `{requested_owner}`"));
            }
        }
        let amount = self
            .amount
            .or(self.available)
            .ok_or_else(|| "balance payload missing `amount`".to_owned())?;
        Ok(Balance {
            owner: requested_owner.to_owned(),
            amount,
            locked: self.locked.unwrap_or(Amount::ZERO),
        })
    }
}

// =============================================================================
// GAME SESSION
// =============================================================================

/// Backend-owned lifecycle of a game. The client only observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Created, waiting for players.
    Pending,
    Active,
    Completed,
    Failed,
    /// Withdrawn by its creator before it started.
    Cancelled,
}

impl GameStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Completed, failed and cancelled sessions never change again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "waiting" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("unknown game status `{s}`")),
        }
    }
}

/// One game instance as tracked by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    id: String,
    participants: Vec<String>,
    status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stake: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    room_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
}

impl GameSession {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Participant ids in seat order. Never empty.
    #[must_use]
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Result payload. Only ever present on completed sessions.
    #[must_use]
    pub fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn stake(&self) -> Option<Amount> {
        self.stake
    }

    #[must_use]
    pub fn room_code(&self) -> Option<&str> {
        self.room_code.as_deref()
    }

    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GameDto {
    id: Option<TextOrNumber>,
    participants: Option<Vec<String>>,
    creator: Option<String>,
    opponent: Option<String>,
    status: Option<String>,
    result: Option<serde_json::Value>,
    stake: Option<Amount>,
    room_code: Option<String>,
    winner: Option<String>,
    created_at: Option<TextOrNumber>,
    // Flat score fields some backends send instead of `result`.
    player1_score: Option<i64>,
    player2_score: Option<i64>,
}

impl GameDto {
    pub(crate) fn into_domain(self) -> Result<GameSession, String> {
        let id = self
            .id
            .map(TextOrNumber::into_string)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| "game payload missing `id`".to_owned())?;

        let participants = match self.participants {
            Some(list) => list,
            None => self.creator.into_iter().chain(self.opponent).collect(),
        };
        if participants.is_empty() {
            return Err(format!("game `{id}` has no participants"));
        }
        if participants.iter().any(|p| p.trim().is_empty()) {
            return Err(format!("game `{id}` has a blank participant id"));
        }

        let status = self
            .status
            .ok_or_else(|| format!("game `{id}` missing `status`"))?
            .parse::<GameStatus>()?;

        if self.result.is_some() && status != GameStatus::Completed {
            return Err(format!("game `{id}` carries a result while {status}"));
        }

        // Scores are placeholders until the game completes.
        let result = match self.result {
            Some(result) => Some(result),
            None if status == GameStatus::Completed => scores_result(self.player1_score, self.player2_score),
            None => None,
        };

        Ok(GameSession {
            id,
            participants,
            status,
            result,
            stake: self.stake,
            room_code: self.room_code,
            winner: self.winner,
            created_at: self.created_at.map(TextOrNumber::into_string),
        })
    }
}

fn scores_result(player1: Option<i64>, player2: Option<i64>) -> Option<serde_json::Value> {
    if player1.is_none() && player2.is_none() {
        return None;
    }
    let mut scores = serde_json::Map::new();
    if let Some(score) = player1 {
        scores.insert("player1Score".to_owned(), score.into());
    }
    if let Some(score) = player2 {
        scores.insert("player2Score".to_owned(), score.into());
    }
    Some(serde_json::Value::Object(scores))
}

// =============================================================================
// NEW GAME
// =============================================================================

/// Parameters for `NetworkClient::create_game_with`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub participants: Vec<String>,
    pub stake: Option<Amount>,
    pub room_code: Option<String>,
}

impl NewGame {
    pub fn new<S: AsRef<str>>(participants: &[S]) -> Self {
        Self {
            participants: participants.iter().map(|p| p.as_ref().to_owned()).collect(),
            stake: None,
            room_code: None,
        }
    }

    #[must_use]
    pub fn with_stake(mut self, stake: Amount) -> Self {
        self.stake = Some(stake);
        self
    }

    #[must_use]
    pub fn with_room_code(mut self, room_code: impl Into<String>) -> Self {
        self.room_code = Some(room_code.into());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateGameBody<'a> {
    pub participants: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stake: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_code: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JoinGameBody<'a> {
    pub player_id: &'a str,
}

#[derive(Serialize)]
pub(crate) struct SubmitResultBody<'a> {
    pub result: &'a serde_json::Value,
}

/// `POST /join` answers either with the session itself or with
/// `{ success, gameId, game }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum JoinGameDto {
    Wrapped { game: GameDto },
    Bare(GameDto),
}

impl JoinGameDto {
    pub(crate) fn into_game(self) -> GameDto {
        match self {
            Self::Wrapped { game } | Self::Bare(game) => game,
        }
    }
}

// =============================================================================
// SERVICE STATUS
// =============================================================================

/// `GET /api/health` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Backend uptime in seconds.
    #[serde(default)]
    pub uptime: Option<f64>,
}

/// State of the ledger node the backend forwards to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub running: bool,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub chain_id: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
