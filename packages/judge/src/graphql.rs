//! Wire types for the judge's GraphQL endpoint.

use leetsync_judge_models::SubmissionDetail;
use serde::{Deserialize, Serialize};

use crate::FetchError;

/// Query text for the submission detail operation, embedded at compile time.
pub(crate) const SUBMISSION_DETAIL_QUERY: &str =
    include_str!("../queries/submission_detail.graphql");

/// Operation name declared in [`SUBMISSION_DETAIL_QUERY`].
pub(crate) const SUBMISSION_DETAIL_OPERATION: &str = "mySubmissionDetail";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphqlRequest<'a, V> {
    pub query: &'a str,
    pub operation_name: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
pub(crate) struct DetailVariables {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlErrorMessage {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetailData {
    pub submission_detail: Option<RawSubmissionDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSubmissionDetail {
    pub code: String,
    pub question: RawQuestion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawQuestion {
    pub question_frontend_id: String,
    #[serde(default)]
    pub translated_title: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl GraphqlResponse<DetailData> {
    /// Validates the response and extracts the submission detail.
    pub(crate) fn into_detail(self, id: u64) -> Result<SubmissionDetail, FetchError> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(FetchError::Graphql(messages.join("; ")));
        }

        let raw = self
            .data
            .and_then(|d| d.submission_detail)
            .ok_or(FetchError::MissingDetail { id })?;

        // leetcode.cn fills `translatedTitle`; leetcode.com leaves it null.
        let title = raw
            .question
            .translated_title
            .filter(|t| !t.is_empty())
            .or(raw.question.title)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FetchError::Decode {
                message: format!("submission {id} has no problem title"),
            })?;

        Ok(SubmissionDetail {
            source_code: raw.code,
            problem_id: raw.question.question_frontend_id,
            problem_title: title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> GraphqlResponse<DetailData> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn prefers_translated_title() {
        let detail = decode(
            r#"{"data":{"submissionDetail":{"code":"package main","question":{
                "questionFrontendId":"1","title":"Two Sum","translatedTitle":"两数之和"}}}}"#,
        )
        .into_detail(7)
        .unwrap();

        assert_eq!(detail.problem_id, "1");
        assert_eq!(detail.problem_title, "两数之和");
        assert_eq!(detail.source_code, "package main");
    }

    #[test]
    fn falls_back_to_plain_title() {
        let detail = decode(
            r#"{"data":{"submissionDetail":{"code":"","question":{
                "questionFrontendId":"LCP 01","title":"Guess Numbers","translatedTitle":null}}}}"#,
        )
        .into_detail(7)
        .unwrap();

        assert_eq!(detail.problem_title, "Guess Numbers");
    }

    #[test]
    fn null_detail_is_missing() {
        let err = decode(r#"{"data":{"submissionDetail":null}}"#)
            .into_detail(42)
            .unwrap_err();
        assert!(matches!(err, FetchError::MissingDetail { id: 42 }));
    }

    #[test]
    fn graphql_errors_are_reported() {
        let err = decode(r#"{"data":null,"errors":[{"message":"rate limited"}]}"#)
            .into_detail(1)
            .unwrap_err();
        assert!(matches!(err, FetchError::Graphql(ref m) if m == "rate limited"));
    }

    #[test]
    fn request_serializes_operation_name_in_camel_case() {
        let body = serde_json::to_value(GraphqlRequest {
            query: SUBMISSION_DETAIL_QUERY,
            operation_name: SUBMISSION_DETAIL_OPERATION,
            variables: DetailVariables { id: "9".to_owned() },
        })
        .unwrap();

        assert_eq!(body["operationName"], "mySubmissionDetail");
        assert_eq!(body["variables"]["id"], "9");
        assert!(body["query"].as_str().unwrap().contains("submissionDetail"));
    }
}
