#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Harvests accepted online-judge submissions into a local solution
//! repository and publishes it.
//!
//! A run logs in, pages through the submission history until it reaches the
//! retention window, writes one file per (problem, language), reconciles the
//! queue of solutions stored under provisional problem ids, and finally hands
//! the output directory to a [`Publisher`].

pub mod config;
pub mod engine;
pub mod naming;
pub mod pending;
pub mod problem_id;
pub mod visited;

#[cfg(test)]
mod test_support;

use leetsync_ingest_models::{IngestReport, Pacing, Settings};
use leetsync_judge::{AuthError, JudgeClient};
use leetsync_publish::{PublishError, Publisher};

pub use engine::IngestEngine;

/// Fatal run errors. Everything else is logged and counted in the report.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("login failed: {0}")]
    Auth(#[from] AuthError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// Performs one complete run: login, ingestion, reconciliation, publish.
///
/// # Errors
///
/// * [`RunError::Auth`] if the judge rejects the session; nothing is written
/// * [`RunError::Publish`] if publishing fails; written files stay in place
pub async fn execute(
    client: &dyn JudgeClient,
    publisher: &dyn Publisher,
    settings: &Settings,
    pacing: Pacing,
) -> Result<IngestReport, RunError> {
    log::info!("Logging in");
    client.login().await?;

    let report = IngestEngine::new(client, settings)
        .with_pacing(pacing)
        .run()
        .await;

    log::info!("Publishing {}", settings.push_dir.display());
    publisher.publish(&settings.push_dir).await?;
    log::info!(
        "Run complete in {:.1}s: {} file(s) written, {} pending",
        report.duration.as_secs_f64(),
        report.written,
        report.pending
    );

    Ok(report)
}
