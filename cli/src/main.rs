use std::future::Future;
use std::time::Duration;

use arena_api::config::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS, ENV_BASE_URL, ENV_CONNECT_TIMEOUT_MS,
    ENV_REQUEST_TIMEOUT_MS,
};
use arena_api::{Amount, ApiError, ClientConfig, NetworkClient, NewGame, RequestOutcome};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

const RETRY_BASE_DELAY_MS: u64 = 250;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] arena_api::ConfigError),
    #[error("request failed ({code}): {source}")]
    Api { code: &'static str, source: ApiError },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<ApiError> for CliError {
    fn from(source: ApiError) -> Self {
        Self::Api { code: source.error_code(), source }
    }
}

#[derive(Parser, Debug)]
#[command(name = "arena-cli", about = "Arena game and balance backend CLI")]
struct Cli {
    #[arg(long, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = ENV_REQUEST_TIMEOUT_MS, default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    timeout_ms: u64,

    #[arg(long, env = ENV_CONNECT_TIMEOUT_MS, default_value_t = DEFAULT_CONNECT_TIMEOUT_MS)]
    connect_timeout_ms: u64,

    /// Extra attempts for failures the client marks retryable.
    #[arg(long, default_value_t = 0)]
    retries: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Health,
    Status,
    Balance { owner: String },
    Game(GameCommand),
}

#[derive(Args, Debug)]
struct GameCommand {
    #[command(subcommand)]
    command: GameSubcommand,
}

#[derive(Subcommand, Debug)]
enum GameSubcommand {
    List,
    Read {
        session_id: String,
    },
    Create {
        #[arg(required = true)]
        participants: Vec<String>,
        #[arg(long)]
        stake: Option<Amount>,
        #[arg(long)]
        room_code: Option<String>,
    },
    Join {
        target: String,
        #[arg(long)]
        player: String,
    },
    Submit {
        session_id: String,
        #[arg(long, help = "Result payload as JSON")]
        data: String,
    },
    Cancel {
        session_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ClientConfig::new(&cli.base_url)?
        .with_request_timeout(Duration::from_millis(cli.timeout_ms))
        .with_connect_timeout(Duration::from_millis(cli.connect_timeout_ms));
    let client = NetworkClient::new(config)?;
    let client = &client;
    let retries = cli.retries;

    match cli.command {
        Command::Health => print_json(&with_retries(retries, move || client.health()).await?),
        Command::Status => print_json(&with_retries(retries, move || client.network_status()).await?),
        Command::Balance { owner } => {
            let owner = owner.as_str();
            print_json(&with_retries(retries, move || client.get_balance(owner)).await?)
        }
        Command::Game(game) => run_game(client, retries, game).await,
    }
}

async fn run_game(client: &NetworkClient, retries: u32, game: GameCommand) -> Result<(), CliError> {
    match game.command {
        GameSubcommand::List => print_json(&with_retries(retries, move || client.open_games()).await?),
        GameSubcommand::Read { session_id } => {
            let session_id = session_id.as_str();
            print_json(&with_retries(retries, move || client.get_game(session_id)).await?)
        }
        GameSubcommand::Create {
            participants,
            stake,
            room_code,
        } => {
            let mut new_game = NewGame::new(participants.as_slice());
            new_game.stake = stake;
            new_game.room_code = room_code;
            // Creation is not idempotent; never repeat it automatically.
            print_json(&client.create_game_with(new_game).await?)
        }
        GameSubcommand::Join { target, player } => {
            print_json(&client.join_game(&target, &player).await?)
        }
        GameSubcommand::Submit { session_id, data } => {
            let payload = serde_json::from_str::<Value>(&data)?;
            print_json(&client.submit_result(&session_id, payload).await?)
        }
        GameSubcommand::Cancel { session_id } => print_json(&client.cancel_game(&session_id).await?),
    }
}

/// Caller-side retry policy: exponential backoff on retryable failures only.
async fn with_retries<T, F, Fut>(retries: u32, mut op: F) -> RequestOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RequestOutcome<T>>,
{
    let mut attempt = 0_u32;
    loop {
        match op().await {
            Err(error) if error.retryable() && attempt < retries => {
                let delay = Duration::from_millis(RETRY_BASE_DELAY_MS.saturating_mul(1 << attempt.min(6)));
                attempt += 1;
                tracing::warn!(attempt, error = %error, ?delay, "retrying request");
                tokio::time::sleep(delay).await;
            }
            outcome => return outcome,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
