//! [`JudgeClient`] implementation for LeetCode.
//!
//! Authenticates with a `LEETCODE_SESSION` cookie, lists submissions through
//! the REST submission dump and fetches source code through GraphQL.

use std::time::Duration;

use async_trait::async_trait;
use leetsync_judge_models::{PAGE_SIZE, SubmissionDetail, SubmissionPage};
use reqwest::header::{CONNECTION, COOKIE, HeaderMap, HeaderValue, REFERER};

use crate::graphql::{
    DetailData, DetailVariables, GraphqlRequest, GraphqlResponse, SUBMISSION_DETAIL_OPERATION,
    SUBMISSION_DETAIL_QUERY,
};
use crate::http::send_json;
use crate::{AuthError, FetchError, JudgeClient};

/// Site the client talks to unless told otherwise.
pub const DEFAULT_ENDPOINT: &str = "https://leetcode.cn/";

/// Number of login rounds before giving up.
const LOGIN_ATTEMPTS: u32 = 3;

/// Pause between failed login rounds.
const LOGIN_RETRY_DELAY: Duration = Duration::from_secs(5);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_2) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/33.0.1750.152 Safari/537.36";

/// HTTP client for a LeetCode site.
#[derive(Debug, Clone)]
pub struct LeetcodeClient {
    client: reqwest::Client,
    /// Site root, always ending in `/`.
    endpoint: String,
    login_retry_delay: Duration,
}

impl LeetcodeClient {
    /// Creates a client for a site root such as [`DEFAULT_ENDPOINT`] or
    /// `https://leetcode.com/`, authenticated by the given session cookie.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the cookie is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn with_endpoint(cookie: &str, endpoint: &str) -> Result<Self, AuthError> {
        let endpoint = if endpoint.ends_with('/') {
            endpoint.to_owned()
        } else {
            format!("{endpoint}/")
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        let session = HeaderValue::from_str(&format!("LEETCODE_SESSION={cookie}"))
            .map_err(|e| AuthError::InvalidCookie(e.to_string()))?;
        headers.insert(COOKIE, session);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            login_retry_delay: LOGIN_RETRY_DELAY,
        })
    }

    /// Overrides the pause between failed login rounds.
    #[must_use]
    pub const fn with_login_retry_delay(mut self, delay: Duration) -> Self {
        self.login_retry_delay = delay;
        self
    }

    /// Returns the site root this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }
}

#[async_trait]
impl JudgeClient for LeetcodeClient {
    async fn login(&self) -> Result<(), AuthError> {
        let login_url = self.url("accounts/login/");

        for attempt in 1..=LOGIN_ATTEMPTS {
            self.client.get(&login_url).send().await?;

            let response = self
                .client
                .post(&login_url)
                .header(REFERER, &login_url)
                .send()
                .await?;

            // A valid session is redirected from the login form to the root.
            if response.status() == reqwest::StatusCode::OK
                && response.url().as_str() == self.endpoint
            {
                log::info!("Login successful");
                return Ok(());
            }

            log::warn!(
                "Login attempt {attempt}/{LOGIN_ATTEMPTS} rejected (HTTP {}, landed on {})",
                response.status(),
                response.url()
            );

            if attempt < LOGIN_ATTEMPTS {
                tokio::time::sleep(self.login_retry_delay).await;
            }
        }

        Err(AuthError::Rejected {
            attempts: LOGIN_ATTEMPTS,
        })
    }

    async fn list_submissions(&self, offset: u32) -> Result<SubmissionPage, FetchError> {
        let url = self.url(&format!(
            "api/submissions/?offset={offset}&limit={PAGE_SIZE}"
        ));
        log::debug!("Fetching submission list at offset {offset}: {url}");

        let page: SubmissionPage = send_json(self.client.get(&url)).await?;

        log::debug!(
            "Offset {offset}: {} submissions, has_next={}",
            page.submissions.len(),
            page.has_next
        );
        Ok(page)
    }

    async fn fetch_detail(&self, submission_id: u64) -> Result<SubmissionDetail, FetchError> {
        let payload = GraphqlRequest {
            query: SUBMISSION_DETAIL_QUERY,
            operation_name: SUBMISSION_DETAIL_OPERATION,
            variables: DetailVariables {
                id: submission_id.to_string(),
            },
        };

        log::debug!("Fetching detail for submission {submission_id}");

        let response: GraphqlResponse<DetailData> =
            send_json(self.client.post(self.url("graphql/")).json(&payload)).await?;

        response.into_detail(submission_id)
    }
}
