//! Request helpers shared by the judge endpoints.
//!
//! Every call goes through [`send_json`], which turns error statuses and
//! undecodable bodies into typed [`FetchError`]s and logs enough of the
//! response to diagnose a changed wire format.

use serde::de::DeserializeOwned;

use crate::FetchError;

/// Maximum number of characters of the response body included in logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Sends a request and decodes the response body as JSON into `T`.
///
/// No retry happens here. Pacing and failure limits are the caller's concern.
pub(crate) async fn send_json<T>(request: reqwest::RequestBuilder) -> Result<T, FetchError>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;

    let url = response.url().to_string();
    let status = response.status();

    if !status.is_success() {
        log::warn!("  HTTP {status} from {url}");
        return Err(FetchError::Status { status, url });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|json_err| {
        let preview = preview(&text);
        log::warn!(
            "JSON decode failed.\n  \
             url: {url}\n  \
             status: {status}\n  \
             content-type: {content_type:?}\n  \
             received: {} bytes\n  \
             parse error: {json_err}\n  \
             body preview: {preview}",
            text.len(),
        );
        FetchError::Decode {
            message: format!(
                "{json_err} (status={status}, received {} bytes, content-type={content_type:?})",
                text.len()
            ),
        }
    })
}

/// Truncates `text` on a character boundary for logging.
fn preview(text: &str) -> String {
    if text.chars().count() > BODY_PREVIEW_LEN {
        let head: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        format!("{head}...")
    } else {
        text.to_owned()
    }
}
