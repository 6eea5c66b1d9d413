//! # Innkeep CLI Entry Point
//!
//! Front-desk command-line tool over the availability & booking engine.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       innkeep <command>                                 │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize tracing (RUST_LOG, stderr)                               │
//! │  3. Load AppConfig (env) + apply flag overrides                        │
//! │  4. Open Database, run migrations                                      │
//! │  5. Spawn mail queue listener                                          │
//! │  6. Run command against &dyn Repository                                │
//! │  7. Close pool, drain mail queue                                       │
//! │  8. Exit code from CliError (0 on success)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod commands;
mod config;
mod error;
mod notify;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use innkeep_db::Database;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::Context;
use config::AppConfig;
use error::CliResult;
use notify::Mailer;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = AppConfig::load()?.with_overrides(&cli)?;
    config::ensure_parent_dir(&config)?;
    debug!(?config, "Configuration loaded");

    let db = Database::new(config.db_config()).await?;
    let (mailer, listener) = Mailer::spawn(config.mail_queue);

    let result = {
        let ctx = Context {
            repo: &db,
            mailer: &mailer,
            json: cli.json,
        };
        let mut out = io::stdout().lock();
        commands::execute(cli.command, &ctx, &mut out).await
    };

    db.close().await;
    drop(mailer);
    match listener.await {
        Ok(sent) => debug!(sent, "Mail queue drained"),
        Err(e) => warn!(error = %e, "Mail listener failed"),
    }

    info!(ok = result.is_ok(), "Done");
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=innkeep=trace` - Show trace for innkeep crates only
/// - Default: `warn`, or `info,innkeep=debug,innkeep_db=debug,sqlx=warn` with `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,innkeep=debug,innkeep_db=debug,sqlx=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
