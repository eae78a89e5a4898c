//! # Menu Sync CLI
//!
//! Batch entrypoint: refreshes the menu cache for the rolling window around
//! today and exits. Meant to be run from cron; overlapping runs are not
//! supported.
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/foodfinder menu-sync -back 2 -forward 7
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use menu_sync::config::MenuSyncConfig;
use menu_sync::logging::init_structured_logging;
use menu_sync::sync::run_from_config;

#[derive(Parser, Debug)]
#[command(name = "menu-sync")]
#[command(about = "Scrape DineOnCampus menus into the menu cache")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Days before today to keep in sync (default: 7)
    #[arg(long, value_name = "N")]
    back: Option<u32>,

    /// Days after today to keep in sync (default: 14)
    #[arg(long, value_name = "N")]
    forward: Option<u32>,

    /// Configuration file path (default: config/menu-sync.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Apply pending schema migrations before syncing
    #[arg(long)]
    migrate: bool,
}

/// Accept the single-dash `-back N` / `-forward N` spelling used by the
/// existing cron entries alongside clap's `--back` / `--forward`.
fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-back" => "--back".to_string(),
            "-forward" => "--forward".to_string(),
            _ => arg,
        })
        .collect()
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args()));
    init_structured_logging();

    let mut config = match MenuSyncConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Some(back) = cli.back {
        config.window.back_days = back;
    }
    if let Some(forward) = cli.forward {
        config.window.forward_days = forward;
    }

    info!(
        back_days = config.window.back_days,
        forward_days = config.window.forward_days,
        "Scraping from {} day(s) ago to {} day(s) from now",
        config.window.back_days,
        config.window.forward_days
    );

    match run_from_config(&config, cli.migrate).await {
        Ok(report) => {
            info!(
                cells_synced = report.cells_synced,
                meals_inserted = report.meals_inserted,
                "Successfully scraped menus to database"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                error = %e,
                recoverable = e.is_recoverable(),
                "Menu sync failed; re-run to converge the cache"
            );
            ExitCode::FAILURE
        }
    }
}
