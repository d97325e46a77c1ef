//! API client for the segment relay

use crate::types::{RelayResponse, SaveSegmentRequest};
use gloo_net::http::Request;

const API_BASE: &str = "/api";

/// Post a segment to the relay.
///
/// A reachable webhook yields `Ok` even when it refused the segment; check
/// `success` on the reply. Transport trouble and relay failures are `Err`.
pub async fn save_segment(request: &SaveSegmentRequest) -> Result<RelayResponse, String> {
    let url = format!("{}/save-segment", API_BASE);
    post_json::<SaveSegmentRequest, RelayResponse>(&url, request).await
}

async fn post_json<T: serde::Serialize, R: serde::de::DeserializeOwned>(
    url: &str,
    body: &T,
) -> Result<R, String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(error_message(status, &text));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Prefer the relay's own `error` field over a bare status line
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<RelayResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}
