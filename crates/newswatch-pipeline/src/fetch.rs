//! Page download shared by the enrichment strategies.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::{FetchError, PipelineError};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Downloads HTML pages with a caller-supplied timeout per request.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// # Errors
    ///
    /// Returns [`PipelineError::Client`] if the `reqwest::Client` cannot be built.
    pub fn new(user_agent: &str) -> Result<Self, PipelineError> {
        let user_agent = if user_agent.trim().is_empty() {
            DEFAULT_USER_AGENT
        } else {
            user_agent
        };
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return its body.
    ///
    /// `Ok(None)` for 404/410 and empty bodies; every other failure is an
    /// `Err`, with timeouts reported as [`FetchError::Timeout`].
    ///
    /// # Errors
    ///
    /// [`FetchError`] for an invalid URL, a network failure, a timeout, or a
    /// non-success status.
    pub async fn fetch_html(&self, url: &str, timeout: Duration) -> Result<Option<String>, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .timeout(timeout)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;
        Ok((!body.trim().is_empty()).then_some(body))
    }
}
