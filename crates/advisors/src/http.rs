use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use common::{Error, Result};

/// Shared HTTP client for every remote advisor. Timeouts are applied per call
/// by the aggregator, not here.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .use_rustls_tls()
        .build()
        .map_err(|e| Error::Http(format!("failed to build HTTP client: {e}")))
}

/// Send the request, reject non-2xx statuses, then decode the body as `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let resp = request.send().await.map_err(|e| Error::Http(e.to_string()))?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(Error::Advisor(format!("HTTP {status}: {}", truncate(&body, 200))));
    }
    Ok(serde_json::from_str(&body)?)
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
