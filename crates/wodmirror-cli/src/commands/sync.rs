//! Sync command - mirror new posts into the output directory
//!
//! Runs on every `wodmirror` invocation:
//! 1. Validates the loaded configuration
//! 2. Resolves the outbound user agent (once, before any page fetch)
//! 3. Creates the adapters (feed client, JSON store)
//! 4. Runs the SyncEngine and prints a summary

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use wodmirror_core::config::Config;
use wodmirror_feed::client::FeedClient;
use wodmirror_feed::user_agent::resolve_user_agent;
use wodmirror_sync::engine::{StopReason, SyncEngine, SyncMode, SyncReport};
use wodmirror_sync::store::JsonRecordStore;

use crate::output::{count, format_duration, HumanFormatter};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Walk the whole feed instead of stopping at the first saved post
    #[arg(long)]
    pub full: bool,
}

impl SyncCommand {
    /// Wires up the adapters, runs one sync pass and prints the result
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let formatter = HumanFormatter;

        let errors = config.validate();
        if !errors.is_empty() {
            for error in &errors {
                formatter.error(&error.to_string());
            }
            bail!("Invalid configuration: {}", count(errors.len() as u32, "problem"));
        }

        let mode = SyncMode::from_full_flag(self.full);

        let user_agent = resolve_user_agent(&config.feed)
            .await
            .context("Failed to resolve a user agent")?;
        let fetcher = Arc::new(FeedClient::new(user_agent, &config.feed)?);
        let store = Arc::new(JsonRecordStore::new(&config.store.output_dir));

        info!(
            %mode,
            output_dir = %store.root().display(),
            "Starting synchronization"
        );

        let engine = SyncEngine::new(fetcher, store, config)?;
        let report = engine.sync(mode).await?;

        formatter.success(&headline(&report));
        for line in summary_lines(&report) {
            formatter.info(&line);
        }

        Ok(())
    }
}

fn headline(report: &SyncReport) -> String {
    let duration = format_duration(report.duration_ms);
    match report.stop_reason {
        StopReason::CaughtUp { .. } if report.records_written == 0 => {
            format!("Already up to date ({duration})")
        }
        StopReason::CaughtUp { .. } => format!("Caught up in {duration}"),
        StopReason::EndOfFeed { page: 1 }
            if report.records_written == 0 && report.records_skipped == 0 =>
        {
            format!("Feed has no posts ({duration})")
        }
        StopReason::EndOfFeed { .. } => format!("Reached the end of the feed in {duration}"),
        StopReason::PageLimit { max_pages } => {
            format!("Stopped at the {max_pages}-page limit after {duration}")
        }
    }
}

fn summary_lines(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Started:  {}",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!("Mode:     {}", report.mode),
        format!("Pages:    {}", report.pages_visited),
        format!("Saved:    {}", count(report.records_written, "record")),
    ];
    if report.records_skipped > 0 {
        lines.push(format!(
            "Skipped:  {} (already saved)",
            count(report.records_skipped, "record")
        ));
    }
    lines.push(format!("Stopped:  {}", report.stop_reason));
    lines
}
