use omnifetch_core::{RetrieveError, Value};

use crate::Settings;

/// HTTP client honoring the configured timeout and user agent.
pub(crate) fn build_client(settings: &Settings) -> Result<reqwest::Client, RetrieveError> {
    reqwest::Client::builder()
        .timeout(settings.request_timeout)
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|err| {
            RetrieveError::configuration(format!("failed to build HTTP client: {err}"))
        })
}

/// Send a request and decode the JSON body, mapping transport failures and
/// non-2xx statuses into the provider error kind.
pub(crate) async fn send_json(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<Value, RetrieveError> {
    let response = request
        .send()
        .await
        .map_err(|err| RetrieveError::provider(provider, err))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| RetrieveError::provider(provider, err))?;

    if !status.is_success() {
        return Err(RetrieveError::provider(
            provider,
            format!("HTTP {}: {}", status.as_u16(), snippet(&body)),
        ));
    }
    tracing::debug!(provider, status = status.as_u16(), bytes = body.len(), "response received");

    serde_json::from_str(&body).map_err(|err| {
        RetrieveError::provider(provider, format!("failed to decode response body: {err}"))
    })
}

fn snippet(body: &str) -> &str {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(200) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    }
}
