//! Shared `reqwest` plumbing.

use std::time::Duration;

use chainlens_core::SourceError;
use serde::de::DeserializeOwned;

/// `User-Agent` sent with every outbound request.
pub const USER_AGENT: &str = concat!("chainlens/", env!("CARGO_PKG_VERSION"));

/// Build the client shared by every source.
///
/// No client-wide timeout is set; each source applies its own per request.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

/// Map a transport error, distinguishing deadlines.
pub(crate) fn transport_error(e: reqwest::Error, timeout: Duration) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout {
            ms: timeout.as_millis() as u64,
        }
    } else {
        SourceError::Http(e.to_string())
    }
}

/// Send a prepared request and decode a JSON body.
///
/// `Ok(None)` on 404, which every source treats as ordinary absence.
pub(crate) async fn send_json<T: DeserializeOwned>(
    source_name: &str,
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<Option<T>, SourceError> {
    let resp = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    let status = resp.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(SourceError::Status {
            source_name: source_name.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp.bytes().await.map_err(|e| transport_error(e, timeout))?;
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|e| SourceError::malformed(source_name, e))
}

/// Trim a configured base URL so paths can be appended with `/`.
pub(crate) fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
