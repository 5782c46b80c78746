use crate::error::{PdpError, Result};
use std::time::Duration;

/// Shared client with a per-request timeout applied to every call.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Turns a non-2xx response into an API error carrying the body text.
pub async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(PdpError::Api {
        status: status.as_u16(),
        message: body,
    })
}
