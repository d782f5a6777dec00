#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion settings, pacing, and run report types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use strum_macros::{Display, EnumString};

/// Seconds in one retention day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Number of failed submissions after which a run stops scraping.
pub const FAILURE_LIMIT: u32 = 3;

/// How solution files are arranged under the output directory.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Layout {
    /// Every solution directly in the output directory
    /// (`0001.two-sum.go`).
    #[default]
    Flat,
    /// One directory per problem (`0001.two-sum/1-two-sum.go`).
    PerProblem,
}

/// Fully resolved run settings: config file merged with CLI overrides.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Session cookie used to authenticate with the judge.
    pub cookie: String,
    /// Directory solutions are written to.
    pub output_dir: PathBuf,
    /// Submissions older than this many days stop the scan.
    pub retention_days: u32,
    /// Directory handed to the publisher.
    pub push_dir: PathBuf,
    /// Whether existing solution files are replaced.
    pub overwrite: bool,
    /// File that carries temporary-id writes between runs.
    pub pending_file: PathBuf,
    /// Output file arrangement.
    pub layout: Layout,
    /// Judge site root.
    pub endpoint: String,
}

impl Settings {
    /// Retention window in seconds.
    #[must_use]
    pub fn retention_secs(&self) -> i64 {
        i64::from(self.retention_days) * SECONDS_PER_DAY
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("cookie", &"<redacted>")
            .field("output_dir", &self.output_dir)
            .field("retention_days", &self.retention_days)
            .field("push_dir", &self.push_dir)
            .field("overwrite", &self.overwrite)
            .field("pending_file", &self.pending_file)
            .field("layout", &self.layout)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Fixed delays applied while scraping to stay under the judge's rate
/// limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after every processed accepted submission.
    pub between_submissions: Duration,
    /// Extra pause after a failed submission.
    pub failure_cooldown: Duration,
    /// Pause before requesting the next page.
    pub between_pages: Duration,
}

impl Pacing {
    /// No delays at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            between_submissions: Duration::ZERO,
            failure_cooldown: Duration::ZERO,
            between_pages: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            between_submissions: Duration::from_secs(10),
            failure_cooldown: Duration::from_secs(6),
            between_pages: Duration::from_secs(3),
        }
    }
}

/// Why the pagination loop ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// The judge reported no further pages.
    #[default]
    Exhausted,
    /// A submission older than the retention window was reached.
    Expired,
    /// A page could not be fetched.
    FetchFailed,
    /// Too many submissions failed; the judge may be rate limiting.
    FailureLimit,
}

/// Outcome counts of reconciling the previous pending-queue file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Entries whose problem id is still temporary; carried forward.
    pub reconfirmed: u64,
    /// Entries whose problem id is now final; temporary file deleted.
    pub resolved: u64,
    /// Entries not seen this run; dropped from the queue.
    pub unobserved: u64,
    /// Lines that could not be parsed; skipped.
    pub malformed: u64,
}

/// Result of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of submission pages fetched.
    pub pages_fetched: u64,
    /// Accepted, non-expired submissions handed to the write path.
    pub accepted: u64,
    /// Submissions skipped because they were not accepted.
    pub rejected: u64,
    /// Accepted submissions whose problem/language was already handled.
    pub duplicates: u64,
    /// Solution files written.
    pub written: u64,
    /// Solutions left alone because the file already existed.
    pub kept_existing: u64,
    /// Submissions that failed to fetch or write.
    pub failures: u64,
    /// Why scraping stopped.
    pub stop_reason: StopReason,
    /// Reconciliation outcome for the previous pending queue.
    pub reconcile: ReconcileSummary,
    /// Entries written to the new pending queue.
    pub pending: u64,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn layout_parses_kebab_case() {
        assert_eq!(Layout::from_str("flat").unwrap(), Layout::Flat);
        assert_eq!(Layout::from_str("per-problem").unwrap(), Layout::PerProblem);
        assert!(Layout::from_str("nested").is_err());
        assert_eq!(Layout::PerProblem.to_string(), "per-problem");
    }

    #[test]
    fn stop_reason_displays_snake_case() {
        assert_eq!(StopReason::FailureLimit.to_string(), "failure_limit");
        assert_eq!(StopReason::Exhausted.to_string(), "exhausted");
    }

    #[test]
    fn default_pacing_matches_rate_limits() {
        let pacing = Pacing::default();
        assert_eq!(pacing.between_submissions, Duration::from_secs(10));
        assert_eq!(pacing.failure_cooldown, Duration::from_secs(6));
        assert_eq!(pacing.between_pages, Duration::from_secs(3));
    }

    #[test]
    fn debug_redacts_cookie() {
        let settings = Settings {
            cookie: "secret-session".to_owned(),
            output_dir: PathBuf::from("/out"),
            retention_days: 2,
            push_dir: PathBuf::from("/out"),
            overwrite: false,
            pending_file: PathBuf::from("pending.txt"),
            layout: Layout::Flat,
            endpoint: "https://leetcode.cn/".to_owned(),
        };

        assert!(!format!("{settings:?}").contains("secret-session"));
        assert_eq!(settings.retention_secs(), 172_800);
    }
}
