#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Publishing of the harvested solution directory.
//!
//! The ingestion pipeline hands its output to a [`Publisher`] once
//! ingestion is complete. [`GitPublisher`] stages, commits and pushes the
//! directory with the `git` command line tool.

use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::process::Command;

/// Errors raised while publishing. Publishing failures are fatal for a run.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The directory to publish does not exist.
    #[error("publish directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// A publish step could not be started.
    #[error("failed to run `{step}`: {source}")]
    Spawn {
        /// The command line that failed to start.
        step: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A publish step exited unsuccessfully.
    #[error("`{step}` exited with {status}: {output}")]
    StepFailed {
        /// The command line that failed.
        step: String,
        /// The exit status as reported by the OS.
        status: String,
        /// Combined stdout and stderr of the step.
        output: String,
    },
}

/// Capability to publish a directory to some remote.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publishes the contents of `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if any publish step fails.
    async fn publish(&self, dir: &Path) -> Result<(), PublishError>;
}

/// Commit message used for a publish on `date`.
#[must_use]
pub fn commit_message(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Publishes by running `git add .`, `git status`, `git commit` and
/// `git push` inside the directory. The first failing step aborts.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    program: String,
}

impl Default for GitPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl GitPublisher {
    /// Creates a publisher that invokes `git` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Creates a publisher that invokes `program` instead of `git`.
    #[must_use]
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_owned(),
        }
    }

    /// Argument lists for each step, in execution order.
    fn steps(message: &str) -> [Vec<&str>; 4] {
        [
            vec!["add", "."],
            vec!["status"],
            vec!["commit", "-m", message],
            vec!["push"],
        ]
    }

    async fn run_step(&self, dir: &Path, args: &[&str]) -> Result<(), PublishError> {
        let step = format!("{} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .map_err(|source| PublishError::Spawn {
                step: step.clone(),
                source,
            })?;

        if !output.status.success() {
            let combined = combined_output(&output);
            log::error!("`{step}` failed ({}):\n{combined}", output.status);
            return Err(PublishError::StepFailed {
                step,
                status: output.status.to_string(),
                output: combined,
            });
        }

        log::info!("`{step}` finished");
        Ok(())
    }
}

#[async_trait]
impl Publisher for GitPublisher {
    async fn publish(&self, dir: &Path) -> Result<(), PublishError> {
        if !dir.is_dir() {
            return Err(PublishError::MissingDirectory(dir.to_path_buf()));
        }

        let message = commit_message(chrono::Local::now().date_naive());
        log::info!("Publishing {} ({message})", dir.display());

        for args in Self::steps(&message) {
            self.run_step(dir, &args).await?;
        }

        Ok(())
    }
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}").trim().to_owned()
}
