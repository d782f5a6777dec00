#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Submission types exchanged with the online judge.
//!
//! These mirror the judge's wire format closely enough to be decoded
//! directly with `serde`, while exposing field names that read naturally in
//! the ingestion engine.

use serde::{Deserialize, Serialize};

/// Number of submissions requested per page of the submission list.
pub const PAGE_SIZE: u32 = 40;

/// Verdict string the judge reports for a solution that passed every test.
pub const ACCEPTED: &str = "Accepted";

/// One entry of the user's submission history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Judge-assigned submission id, used to fetch the full detail.
    pub id: u64,
    /// Display name of the submission language (e.g. `"C++"`, `"Go"`).
    #[serde(rename = "lang")]
    pub language: String,
    /// Verdict as displayed by the judge (e.g. `"Accepted"`).
    #[serde(rename = "status_display")]
    pub status: String,
    /// Submission time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Relative URL of the submission page.
    #[serde(default)]
    pub url: String,
    /// Problem title as shown in the list (may differ from the detail title).
    #[serde(default)]
    pub title: String,
}

impl Submission {
    /// Whether the judge accepted this submission.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == ACCEPTED
    }
}

/// A page of the submission history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPage {
    /// Submissions on this page, in descending recency.
    #[serde(rename = "submissions_dump", default)]
    pub submissions: Vec<Submission>,
    /// Whether the judge has more pages after this one.
    #[serde(default)]
    pub has_next: bool,
    /// Opaque continuation key returned by the judge.
    #[serde(default)]
    pub last_key: Option<String>,
}

/// Source code and problem metadata for a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDetail {
    /// The submitted source code.
    pub source_code: String,
    /// Frontend problem id. Usually numeric, but contest and special
    /// problem sets use alphanumeric ids.
    pub problem_id: String,
    /// Human-readable problem title.
    pub problem_title: String,
}
