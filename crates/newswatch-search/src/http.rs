//! Shared request plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::SearchError;
use crate::rate_limit::retry_with_backoff;
use crate::types::SearchSettings;

pub(crate) fn build_client(settings: &SearchSettings) -> Result<Client, SearchError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(&settings.user_agent)
        .build()?)
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, SearchError> {
    Url::parse(raw).map_err(|e| SearchError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// GET `url` and decode the JSON body, retrying transient failures.
///
/// `context` names the request in deserialization errors; it must not contain secrets.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &Url,
    provider: &str,
    context: &str,
    settings: &SearchSettings,
) -> Result<T, SearchError> {
    let body = retry_with_backoff(
        settings.max_retries,
        settings.backoff_base_ms,
        move || async move {
            let response = client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| SearchError::Http(e.without_url()))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(1);
                return Err(SearchError::RateLimited {
                    provider: provider.to_string(),
                    retry_after_secs,
                });
            }
            if !status.is_success() {
                return Err(SearchError::UnexpectedStatus {
                    status: status.as_u16(),
                    provider: provider.to_string(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| SearchError::Http(e.without_url()))
        },
    )
    .await?;

    serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
