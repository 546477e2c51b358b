//! # RadioSync Configurator
//!
//! Application layer around `radiosync-core`: loads the deployment config,
//! owns the session, exposes commands, and submits orders.
//!
//! ## Module Organization
//! ```text
//! radiosync_configurator/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── AppConfig: TOML file + environment overrides
//! ├── error.rs        ◄─── ApiError returned to the presentation layer
//! ├── transport.rs    ◄─── OrderTransport trait, SubmissionRequest
//! ├── state/
//! │   ├── session.rs     ◄─── Session (configuration + breakdown)
//! │   └── submission.rs  ◄─── SubmissionOutbox (retry without re-entry)
//! ├── commands/
//! │   ├── configuration.rs
//! │   ├── cart.rs
//! │   └── order.rs
//! └── console.rs      ◄─── stdin/stdout line driver
//! ```

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod state;
pub mod transport;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, ConfigError};
use console::Console;
use state::{Session, SubmissionOutbox};
use transport::LogTransport;

/// Startup or I/O failure of the console app.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the console configurator until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,radiosync=debug, overridden with RUST_LOG           │
/// │                                                                         │
/// │  2. Load Config ──────────────────────────────────────────────────────► │
/// │     • --config path, RADIOSYNC_CONFIG, or the platform config dir       │
/// │     • RADIOSYNC_* environment overrides, then validation                │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • Session with the configured zone and VAT defaults                 │
/// │     • SubmissionOutbox with the configured attempt limit                │
/// │                                                                         │
/// │  4. Read Commands ────────────────────────────────────────────────────► │
/// │     • one line in, one JSON document out                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> Result<(), RunError> {
    init_tracing();

    info!("Starting RadioSync configurator");

    let app = AppConfig::load(config_path)?;
    let session = Session::from_app_config(&app)?;
    let outbox = SubmissionOutbox::new(app.submission.max_attempts);

    let mut console = Console::new(session, outbox, Arc::new(LogTransport))
        .with_default_webhook(app.submission.webhook_url.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    console::run_loop(&mut console, stdin, tokio::io::stdout()).await?;

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every command, including rejected input
/// - `RUST_LOG=radiosync=trace` - Trace for radiosync crates only
/// - Default: INFO, DEBUG for radiosync
///
/// Logs go to stderr so stdout carries only JSON.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,radiosync=debug"));

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
