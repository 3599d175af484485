//! Client for `SerpApi`'s Google News vertical (`tbm=nws`).

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::collect::SearchProvider;
use crate::error::SearchError;
use crate::http::{build_client, get_json, parse_base_url};
use crate::types::{SearchHit, SearchSettings, SerpApiNewsResponse};

const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";

/// `SerpApi` reports an empty result set as an error string rather than an empty list.
const NO_RESULTS_MARKER: &str = "hasn't returned any results";

/// Upper bound on results per query.
pub const MAX_RESULTS: u32 = 100;

pub struct NewsSearchClient {
    client: Client,
    api_key: String,
    base_url: Url,
    settings: SearchSettings,
}

impl NewsSearchClient {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, settings: SearchSettings) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SearchError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        settings: SearchSettings,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            client: build_client(&settings)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(base_url)?,
            settings,
        })
    }

    /// Fetch up to `max_results` news hits for `query` in one request.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Api`] if the response carries an `error` other than "no results".
    /// - [`SearchError::RateLimited`] / [`SearchError::UnexpectedStatus`] /
    ///   [`SearchError::Http`] once retries are exhausted.
    /// - [`SearchError::Deserialize`] if the body is not the expected JSON.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError> {
        let num = max_results.min(MAX_RESULTS);
        let url = self.search_url(query, num);

        tracing::info!(query, "searching SerpApi news");

        let response: SerpApiNewsResponse = get_json(
            &self.client,
            &url,
            "serpapi",
            &format!("serpapi news(q={query})"),
            &self.settings,
        )
        .await?;

        let Some(items) = response.news_results else {
            return match response.error {
                Some(message) if !message.contains(NO_RESULTS_MARKER) => Err(SearchError::Api {
                    provider: "serpapi".to_string(),
                    message,
                }),
                _ => {
                    tracing::info!(query, "no news found");
                    Ok(Vec::new())
                }
            };
        };

        let mut hits: Vec<SearchHit> = items.into_iter().map(SearchHit::from).collect();
        hits.truncate(num as usize);
        tracing::info!(query, count = hits.len(), "news search complete");
        Ok(hits)
    }

    fn search_url(&self, query: &str, num: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("engine", "google")
            .append_pair("tbm", "nws")
            .append_pair("q", query)
            .append_pair("num", &num.to_string())
            .append_pair("gl", &self.settings.region)
            .append_pair("api_key", &self.api_key);
        url
    }
}

#[async_trait]
impl SearchProvider for NewsSearchClient {
    fn name(&self) -> &'static str {
        "news"
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError> {
        NewsSearchClient::search(self, query, max_results).await
    }
}
