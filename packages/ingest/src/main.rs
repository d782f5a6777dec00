#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the submission harvester.

use std::path::PathBuf;

use clap::Parser;
use leetsync_ingest::config::{self, CliOverrides, ConfigFile};
use leetsync_ingest_models::{Layout, Pacing};
use leetsync_judge::LeetcodeClient;
use leetsync_publish::GitPublisher;

#[derive(Parser)]
#[command(
    name = "leetsync",
    about = "Harvest accepted judge submissions into a git repository"
)]
struct Cli {
    /// Session cookie (`LEETCODE_SESSION` value)
    #[arg(short = 'c', long)]
    cookie: Option<String>,

    /// Directory solution files are written to
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Only harvest submissions from the last N days (0 uses the config file)
    #[arg(short = 'd', long, default_value_t = 0)]
    day: u32,

    /// Replace solution files that already exist
    #[arg(short = 'O', long)]
    overwrite: bool,

    /// Path of the JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path of the pending-reprocessing queue file
    #[arg(long)]
    pending_file: Option<PathBuf>,

    /// Output layout: `flat` or `per-problem`
    #[arg(long)]
    layout: Option<Layout>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let file = ConfigFile::load(&cli.config).await?;
    let settings = config::resolve(
        file,
        CliOverrides {
            cookie: cli.cookie,
            output_dir: cli.output,
            day: cli.day,
            overwrite: cli.overwrite,
            pending_file: cli.pending_file,
            layout: cli.layout,
        },
    )?;
    log::debug!("Resolved settings: {settings:?}");

    let client = LeetcodeClient::with_endpoint(&settings.cookie, &settings.endpoint)?;
    let publisher = GitPublisher::new();

    let report =
        leetsync_ingest::execute(&client, &publisher, &settings, Pacing::default()).await?;

    log::info!(
        "Stopped because: {}; {} page(s), {} accepted, {} written, {} kept, {} duplicate(s), {} failure(s)",
        report.stop_reason,
        report.pages_fetched,
        report.accepted,
        report.written,
        report.kept_existing,
        report.duplicates,
        report.failures,
    );

    Ok(())
}
