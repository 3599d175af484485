//! Client for the Google Custom Search JSON API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::collect::SearchProvider;
use crate::error::SearchError;
use crate::http::{build_client, get_json, parse_base_url};
use crate::types::{CseResponse, SearchHit, SearchSettings};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Results per page accepted by the API.
const PAGE_SIZE: u32 = 10;

/// The API refuses `start + num > 101`, so 91 is the last usable page start.
const MAX_START: u32 = 91;

/// Upper bound on results per query.
pub const MAX_RESULTS: u32 = 100;

/// Client for Google Custom Search.
///
/// Use [`GoogleSearchClient::new`] for production or
/// [`GoogleSearchClient::with_base_url`] to point at a mock server in tests.
pub struct GoogleSearchClient {
    client: Client,
    api_key: String,
    search_engine_id: String,
    base_url: Url,
    settings: SearchSettings,
    sort_by_date: bool,
}

impl GoogleSearchClient {
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        search_engine_id: &str,
        settings: SearchSettings,
    ) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, search_engine_id, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SearchError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        search_engine_id: &str,
        settings: SearchSettings,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            client: build_client(&settings)?,
            api_key: api_key.to_owned(),
            search_engine_id: search_engine_id.to_owned(),
            base_url: parse_base_url(base_url)?,
            settings,
            sort_by_date: false,
        })
    }

    /// Ask the API to order results by date instead of relevance.
    #[must_use]
    pub fn sort_by_date(mut self, enabled: bool) -> Self {
        self.sort_by_date = enabled;
        self
    }

    /// Fetch up to `max_results` hits (capped at [`MAX_RESULTS`]) for `query`.
    ///
    /// Pages through the API ten results at a time and stops at the first page
    /// without `items`. A failure on the first page is returned; a failure on a
    /// later page is logged and the hits gathered so far are returned.
    ///
    /// # Errors
    ///
    /// Any [`SearchError`] raised while fetching the first page.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError> {
        let max_results = max_results.min(MAX_RESULTS) as usize;
        let mut hits: Vec<SearchHit> = Vec::with_capacity(max_results);
        let mut start = 1u32;

        tracing::info!(query, max_results, "searching Google Custom Search");

        while hits.len() < max_results && start <= MAX_START {
            #[allow(clippy::cast_possible_truncation)]
            let remaining = (max_results - hits.len()) as u32;
            let num = remaining.min(PAGE_SIZE);
            let url = self.page_url(query, start, num);

            let page: CseResponse = match get_json(
                &self.client,
                &url,
                "google",
                &format!("customsearch(q={query}, start={start})"),
                &self.settings,
            )
            .await
            {
                Ok(page) => page,
                Err(e) if start == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        query,
                        start,
                        error = %e,
                        "Google page fetch failed, keeping results gathered so far"
                    );
                    break;
                }
            };

            let Some(items) = page.items.filter(|items| !items.is_empty()) else {
                break;
            };
            for item in items {
                tracing::debug!(link = item.link.as_deref().unwrap_or("N/A"), "found");
                hits.push(SearchHit::from(item));
            }

            start += PAGE_SIZE;
            if self.settings.inter_request_delay_ms > 0 && hits.len() < max_results {
                tokio::time::sleep(Duration::from_millis(self.settings.inter_request_delay_ms))
                    .await;
            }
        }

        hits.truncate(max_results);
        tracing::info!(query, count = hits.len(), "Google search complete");
        Ok(hits)
    }

    fn page_url(&self, query: &str, start: u32, num: u32) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("key", &self.api_key)
                .append_pair("cx", &self.search_engine_id)
                .append_pair("q", query)
                .append_pair("start", &start.to_string())
                .append_pair("num", &num.to_string())
                .append_pair("gl", &self.settings.region);
            if self.sort_by_date {
                pairs.append_pair("sort", "date");
            }
        }
        url
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError> {
        GoogleSearchClient::search(self, query, max_results).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleSearchClient {
        GoogleSearchClient::with_base_url(
            "test-key",
            "engine",
            SearchSettings::default(),
            "http://localhost/customsearch/v1",
        )
        .unwrap()
    }

    #[test]
    fn page_url_carries_paging_and_region() {
        let url = client().page_url("Roman Neyter", 11, 10);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "Roman Neyter".into())));
        assert!(pairs.contains(&("start".into(), "11".into())));
        assert!(pairs.contains(&("num".into(), "10".into())));
        assert!(pairs.contains(&("gl".into(), "ua".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "sort"));
    }

    #[test]
    fn page_url_adds_sort_when_enabled() {
        let url = client().sort_by_date(true).page_url("q", 1, 10);
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "sort" && v == "date"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result =
            GoogleSearchClient::with_base_url("k", "cx", SearchSettings::default(), "not a url");
        assert!(matches!(result, Err(SearchError::InvalidBaseUrl { .. })));
    }
}
