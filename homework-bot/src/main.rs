//! Homework Bot
//!
//! Watches the review status of one homework submission and reports every
//! change to a Telegram chat.
//!
//! Architecture:
//! - Configuration: flags, environment variables and an optional `.env` file
//! - Repositories: trait views over the homework API and Telegram clients
//! - Scheduler: the poll-parse-compare-notify loop and its in-memory state
//!
//! Only missing or invalid configuration stops the process. Every failure
//! inside the loop is logged, reported to the chat and retried after the
//! retry period.

mod config;
mod error;
mod logging;
mod repository;
mod scheduler;
mod shutdown;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use homework_client::{DEFAULT_TELEGRAM_API_URL, PracticumClient, TelegramClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::{
    Config, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_PERIOD_SECS,
};
use crate::scheduler::StatusPoller;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Telegram notifier for homework review status changes", long_about = None)]
struct Cli {
    /// OAuth token for the homework API
    #[arg(long, env = "PRACTICUM_TOKEN", hide_env_values = true)]
    practicum_token: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    telegram_token: Option<String>,

    /// Chat that receives notifications
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: Option<String>,

    /// Homework-statuses endpoint
    #[arg(long, env = "HOMEWORK_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_TELEGRAM_API_URL)]
    telegram_api_url: String,

    /// Seconds to wait after every poll cycle
    #[arg(long, env = "RETRY_PERIOD", default_value_t = DEFAULT_RETRY_PERIOD_SECS)]
    retry_period: u64,

    /// Timeout in seconds for a single HTTP call
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout: u64,

    /// Also write logs to daily-rotated files named after this path
    #[arg(long, env = "HOMEWORK_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Unix timestamp to start polling from instead of now
    #[arg(long)]
    from_date: Option<i64>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn to_config(&self) -> Config {
        Config {
            endpoint: self.endpoint.clone(),
            telegram_api_url: self.telegram_api_url.clone(),
            retry_period: Duration::from_secs(self.retry_period),
            request_timeout: Duration::from_secs(self.request_timeout),
            log_file: self.log_file.clone(),
            ..Config::new(
                self.practicum_token.clone().unwrap_or_default(),
                self.telegram_token.clone().unwrap_or_default(),
                self.telegram_chat_id.clone().unwrap_or_default(),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Environment must be populated before clap reads it
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    logging::init(cli.log_file.as_deref())?;

    if let Ok(path) = &dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    info!("Starting homework bot");

    let config = cli.to_config();
    if let Err(e) = config.validate() {
        error!("{}", e);
        return Err(e.into());
    }
    info!(
        "Loaded configuration: endpoint={}, chat_id={}, retry_period={:?}",
        config.endpoint, config.telegram_chat_id, config.retry_period
    );

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let homeworks =
        PracticumClient::with_client(&config.endpoint, &config.practicum_token, http.clone());
    let telegram = TelegramClient::with_base_url(
        &config.telegram_api_url,
        &config.telegram_token,
        &config.telegram_chat_id,
        http,
    );

    let mut poller = StatusPoller::new(homeworks, telegram, config.retry_period);
    if let Some(from_date) = cli.from_date {
        poller = poller.with_cursor(from_date);
    }

    if cli.once {
        let outcome = poller.poll_once().await;
        info!(?outcome, "Single cycle finished");
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    shutdown::cancel_on_signal(shutdown.clone());

    poller.run(shutdown).await;

    info!(cursor = poller.state().cursor, "Homework bot stopped");
    Ok(())
}
