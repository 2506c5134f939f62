//! Spendora CLI
//!
//! Usage:
//!   spendora --owner alice add-expense "Lunch" 12.50 --category Food
//!   spendora --owner alice dashboard
//!   spendora --owner alice insights --daily

mod cli;
mod commands;

use clap::Parser;
use dotenvy::dotenv;
use spendora::{
    config::{database, settings},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;

/// Log filter used when `RUST_LOG` is not set.
const fn default_log_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing (as early as possible)
    // Priority: RUST_LOG env var > --verbose flag > default (info).
    // Logs go to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Authentication is external; the caller names the owner
    let owner = cli.owner()?.to_string();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load settings (defaults when the file is missing)
    let settings = settings::load_settings_or_default(&cli.config)
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;

    // 4. Connect and make sure the tables exist
    commands::ensure_database_dir(&settings.database_url)?;
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;
    info!("Database initialized successfully.");

    // 5. Run the command
    commands::run(&db, &settings, &owner, cli.command).await
}
