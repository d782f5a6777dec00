#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Online judge access for the submission harvester.
//!
//! The ingestion engine only talks to the judge through the [`JudgeClient`]
//! trait, so it can be driven by the real [`leetcode::LeetcodeClient`] or by
//! an in-memory fake in tests.

mod graphql;
mod http;
pub mod leetcode;

use async_trait::async_trait;
use leetsync_judge_models::{SubmissionDetail, SubmissionPage};

pub use leetcode::LeetcodeClient;

/// Errors raised while establishing a judge session.
///
/// Authentication failures are fatal for a run.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session cookie cannot be sent as an HTTP header.
    #[error("invalid session cookie: {0}")]
    InvalidCookie(String),

    /// The judge did not accept the session after every attempt.
    #[error("login rejected after {attempts} attempt(s), check the session cookie")]
    Rejected {
        /// How many login rounds were tried.
        attempts: u32,
    },
}

/// Errors raised while fetching submission data.
///
/// These are recoverable: the engine counts them towards its failure limit
/// instead of aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The judge answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The response status.
        status: reqwest::StatusCode,
        /// The final request URL.
        url: String,
    },

    /// The response body did not have the expected shape.
    #[error("Parse error: {message}")]
    Decode {
        /// Description of what went wrong.
        message: String,
    },

    /// The GraphQL endpoint reported errors.
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// The judge returned no detail for the submission.
    #[error("no detail available for submission {id}")]
    MissingDetail {
        /// The submission that was requested.
        id: u64,
    },
}

/// Capability to read a user's submission history from an online judge.
#[async_trait]
pub trait JudgeClient: Send + Sync {
    /// Establishes an authenticated session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the judge rejects the session.
    async fn login(&self) -> Result<(), AuthError>;

    /// Fetches the page of submissions starting at `offset`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request or response decoding fails.
    async fn list_submissions(&self, offset: u32) -> Result<SubmissionPage, FetchError>;

    /// Fetches source code and problem metadata for one submission.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request or response decoding fails, or
    /// the judge has no detail for `submission_id`.
    async fn fetch_detail(&self, submission_id: u64) -> Result<SubmissionDetail, FetchError>;
}
