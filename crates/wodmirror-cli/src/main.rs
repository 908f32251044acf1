//! wodmirror CLI - mirror a workout-of-the-day blog into JSON files
//!
//! `wodmirror` fetches new posts newest first and stops at the first one
//! already on disk. `wodmirror --full` walks the whole feed and fills any
//! gaps, leaving existing files untouched.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wodmirror_core::config::Config;

mod commands;
mod output;

use commands::sync::SyncCommand;

#[derive(Debug, Parser)]
#[command(
    name = "wodmirror",
    version,
    about = "Incrementally mirror a workout-of-the-day blog"
)]
pub struct Cli {
    #[command(flatten)]
    sync: SyncCommand,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Config::resolve_path();
    let config = Config::load_if_exists(&config_path)?;

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    info!(config_path = %config_path.display(), "Loaded configuration");

    cli.sync.execute(&config).await
}
