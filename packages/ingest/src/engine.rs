//! The submission ingestion engine.
//!
//! One [`IngestEngine`] performs one run: it pages through the submission
//! history newest first, writes each accepted solution at most once, then
//! reconciles and rewrites the pending queue.

use std::path::{Path, PathBuf};
use std::time::Instant;

use leetsync_ingest_models::{FAILURE_LIMIT, IngestReport, Pacing, Settings, StopReason};
use leetsync_judge::{FetchError, JudgeClient};
use leetsync_judge_models::{PAGE_SIZE, Submission};

use crate::naming::{NamingError, PathNamer};
use crate::pending::{self, PendingEntry, PendingQueue};
use crate::problem_id;
use crate::visited::{DedupKey, VisitedSet};

/// Errors writing a solution file. Recoverable: the submission is skipped.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// No file name could be derived for the problem.
    #[error("cannot name solution file: {0}")]
    Naming(#[from] NamingError),

    /// The file could not be checked or written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// The solution file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Why a single submission could not be processed.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// What happened to an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Processed {
    /// Its problem and language were already handled this run.
    Duplicate,
    /// A solution file already existed and overwriting is off.
    KeptExisting,
    /// The solution file was written.
    Written,
}

/// How a page of submissions ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    Completed,
    Expired,
    FailureLimit,
}

/// Drives a single ingestion run against a [`JudgeClient`].
///
/// The engine exclusively owns the run's [`VisitedSet`] and
/// [`PendingQueue`]; both start empty and are dropped with the engine.
pub struct IngestEngine<'a> {
    client: &'a dyn JudgeClient,
    settings: &'a Settings,
    namer: PathNamer,
    pacing: Pacing,
    visited: VisitedSet,
    queue: PendingQueue,
    failures: u32,
}

impl<'a> IngestEngine<'a> {
    #[must_use]
    pub fn new(client: &'a dyn JudgeClient, settings: &'a Settings) -> Self {
        Self {
            client,
            settings,
            namer: PathNamer::new(settings.layout),
            pacing: Pacing::default(),
            visited: VisitedSet::new(),
            queue: PendingQueue::new(),
            failures: 0,
        }
    }

    /// Replaces the default rate-limit delays.
    #[must_use]
    pub const fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Scrapes, reconciles the pending queue, and persists it.
    ///
    /// Never fails as a whole: per-submission and per-page problems are
    /// logged and reflected in the returned report.
    pub async fn run(mut self) -> IngestReport {
        let start = Instant::now();
        let mut report = IngestReport::default();

        if let Err(e) = tokio::fs::create_dir_all(&self.settings.output_dir).await {
            log::warn!(
                "Failed to create output directory {}: {e}",
                self.settings.output_dir.display()
            );
        }

        let now = chrono::Utc::now().timestamp();
        log::info!(
            "Start scraping (retention {} day(s))",
            self.settings.retention_days
        );
        let stop_reason = self.scrape(now, &mut report).await;
        report.stop_reason = stop_reason;
        log::info!(
            "End scraping ({}): {} written, {} duplicates, {} failures",
            report.stop_reason,
            report.written,
            report.duplicates,
            report.failures
        );

        report.reconcile = self.reconcile_pending().await;
        report.pending = self.queue.len() as u64;
        self.persist_pending().await;

        report.duration = start.elapsed();
        report
    }

    /// Pages through the submission history until it ends, expires, fails
    /// to load, or too many submissions fail.
    async fn scrape(&mut self, now: i64, report: &mut IngestReport) -> StopReason {
        let mut offset: u32 = 0;

        loop {
            let page = match self.client.list_submissions(offset).await {
                Ok(page) => page,
                Err(e) => {
                    log::error!("Failed to get submission list at offset {offset}: {e}");
                    return StopReason::FetchFailed;
                }
            };
            report.pages_fetched += 1;

            match self.process_page(&page.submissions, now, report).await {
                PageOutcome::Completed => {}
                PageOutcome::Expired => {
                    log::info!("Reached submissions older than the retention window");
                    return StopReason::Expired;
                }
                PageOutcome::FailureLimit => return StopReason::FailureLimit,
            }

            if !page.has_next {
                log::info!("No more submissions");
                return StopReason::Exhausted;
            }

            offset += PAGE_SIZE;
            tokio::time::sleep(self.pacing.between_pages).await;
        }
    }

    async fn process_page(
        &mut self,
        submissions: &[Submission],
        now: i64,
        report: &mut IngestReport,
    ) -> PageOutcome {
        for submission in submissions {
            // Newest first: everything after the first expired one is older.
            if self.is_expired(submission, now) {
                return PageOutcome::Expired;
            }
            if !submission.is_accepted() {
                report.rejected += 1;
                continue;
            }
            report.accepted += 1;

            match self.process_submission(submission).await {
                Ok(Processed::Duplicate) => report.duplicates += 1,
                Ok(Processed::KeptExisting) => report.kept_existing += 1,
                Ok(Processed::Written) => report.written += 1,
                Err(e) => {
                    log::warn!("Error processing submission {}: {e}", submission.id);
                    self.failures += 1;
                    report.failures += 1;
                    if self.failures >= FAILURE_LIMIT {
                        log::error!(
                            "{} submissions failed, the judge may be rate limiting; stopping",
                            self.failures
                        );
                        return PageOutcome::FailureLimit;
                    }
                    tokio::time::sleep(self.pacing.failure_cooldown).await;
                }
            }

            tokio::time::sleep(self.pacing.between_submissions).await;
        }

        PageOutcome::Completed
    }

    fn is_expired(&self, submission: &Submission, now: i64) -> bool {
        now - submission.timestamp > self.settings.retention_secs()
    }

    /// Fetches, deduplicates, and stores one accepted submission.
    async fn process_submission(
        &mut self,
        submission: &Submission,
    ) -> Result<Processed, SubmissionError> {
        let detail = self.client.fetch_detail(submission.id).await?;

        let key = DedupKey::new(&detail.problem_title, &submission.language);
        if !self.visited.insert(key.clone(), &detail.problem_id) {
            log::debug!("Skipping submission {}: {key} already stored", submission.id);
            return Ok(Processed::Duplicate);
        }

        let path = self
            .namer
            .path_for(
                &detail.problem_id,
                &detail.problem_title,
                &submission.language,
                &self.settings.output_dir,
            )
            .map_err(WriteError::from)?;
        log::debug!("{} -> {}", submission.id, path.display());

        if !self.settings.overwrite && exists(&path).await? {
            return Ok(Processed::KeptExisting);
        }

        write_solution(&path, &detail.source_code).await?;
        log::info!("Wrote {}", path.display());

        if problem_id::is_temporary(&detail.problem_id) {
            self.queue.push(PendingEntry {
                path,
                title: detail.problem_title,
                language: submission.language.clone(),
            });
        }

        Ok(Processed::Written)
    }

    async fn reconcile_pending(&mut self) -> leetsync_ingest_models::ReconcileSummary {
        let previous = match pending::load(&self.settings.pending_file).await {
            Ok(previous) => previous,
            Err(e) => {
                log::error!(
                    "Failed to read pending queue {}: {e}",
                    self.settings.pending_file.display()
                );
                Vec::new()
            }
        };

        pending::reconcile(
            previous,
            &self.visited,
            &self.namer,
            &self.settings.output_dir,
            &mut self.queue,
        )
        .await
    }

    async fn persist_pending(&self) {
        match pending::persist(&self.settings.pending_file, &self.queue).await {
            Ok(()) if self.queue.is_empty() => log::info!("No temporary code pending"),
            Ok(()) => {
                for entry in self.queue.entries() {
                    log::info!("Recorded temporary code: {entry}");
                }
            }
            Err(e) => log::error!(
                "Failed to write pending queue {}: {e}",
                self.settings.pending_file.display()
            ),
        }
    }
}

async fn exists(path: &Path) -> Result<bool, WriteError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_solution(path: &Path, code: &str) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, code).await.map_err(io_err)
}
