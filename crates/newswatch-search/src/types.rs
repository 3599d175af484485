use serde::Deserialize;
use serde_json::{Map, Value};

use newswatch_core::AppConfig;

/// One result item from any provider, before it is tagged with a subject.
///
/// Missing fields degrade to empty strings (or `None` for the date).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub source: String,
    pub raw_date: Option<String>,
}

/// HTTP and paging settings shared by all provider clients.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// `gl` region code sent with every query.
    pub region: String,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// Pause between consecutive page requests.
    pub inter_request_delay_ms: u64,
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            region: config.search_region.clone(),
            max_retries: config.search_max_retries,
            backoff_base_ms: config.search_retry_backoff_ms,
            inter_request_delay_ms: config.inter_query_delay_ms,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "newswatch/0.1".to_string(),
            region: "ua".to_string(),
            max_retries: 0,
            backoff_base_ms: 0,
            inter_request_delay_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Google Custom Search JSON API
// ---------------------------------------------------------------------------

/// Top-level response from `customsearch/v1`. `items` is absent past the last page.
#[derive(Debug, Deserialize)]
pub struct CseResponse {
    #[serde(default)]
    pub items: Option<Vec<CseItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CseItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub display_link: Option<String>,
    #[serde(default)]
    pub pagemap: Option<CsePagemap>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CsePagemap {
    #[serde(default)]
    pub metatags: Vec<Map<String, Value>>,
}

impl CseItem {
    /// `article:published_time` from the first metatags block, if present and non-empty.
    #[must_use]
    pub fn published_time(&self) -> Option<String> {
        self.pagemap
            .as_ref()?
            .metatags
            .first()?
            .get("article:published_time")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

impl From<CseItem> for SearchHit {
    fn from(item: CseItem) -> Self {
        let raw_date = item.published_time();
        Self {
            title: item.title.unwrap_or_default(),
            link: item.link.unwrap_or_default(),
            source: item.display_link.unwrap_or_default(),
            raw_date,
        }
    }
}

// ---------------------------------------------------------------------------
// SerpApi Google News (tbm=nws)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SerpApiNewsResponse {
    #[serde(default)]
    pub news_results: Option<Vec<SerpApiNewsItem>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SerpApiNewsItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// A plain publisher name, or `{ "name": ..., "icon": ... }` on newer engines.
    #[serde(default)]
    pub source: Option<Value>,
    #[serde(default)]
    pub date: Option<String>,
}

impl SerpApiNewsItem {
    fn source_name(&self) -> String {
        match &self.source {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(map)) => map
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        }
    }
}

impl From<SerpApiNewsItem> for SearchHit {
    fn from(item: SerpApiNewsItem) -> Self {
        let source = item.source_name();
        Self {
            title: item.title.unwrap_or_default(),
            link: item.link.unwrap_or_default(),
            source,
            raw_date: item.date.filter(|d| !d.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cse_item_with_all_fields() {
        let item: CseItem = serde_json::from_value(json!({
            "title": "Agrocenter report",
            "link": "https://example.com/a",
            "displayLink": "example.com",
            "pagemap": { "metatags": [{ "article:published_time": "2023-05-01T10:00:00Z" }] }
        }))
        .unwrap();
        let hit = SearchHit::from(item);
        assert_eq!(hit.title, "Agrocenter report");
        assert_eq!(hit.source, "example.com");
        assert_eq!(hit.raw_date.as_deref(), Some("2023-05-01T10:00:00Z"));
    }

    #[test]
    fn cse_item_missing_fields_degrades_to_empty() {
        let item: CseItem = serde_json::from_value(json!({})).unwrap();
        let hit = SearchHit::from(item);
        assert_eq!(hit, SearchHit::default());
    }

    #[test]
    fn cse_item_with_empty_metatags_has_no_date() {
        let item: CseItem = serde_json::from_value(json!({
            "link": "https://example.com/a",
            "pagemap": { "metatags": [] }
        }))
        .unwrap();
        assert!(item.published_time().is_none());

        let item: CseItem = serde_json::from_value(json!({
            "link": "https://example.com/a",
            "pagemap": { "metatags": [{ "article:published_time": "" }] }
        }))
        .unwrap();
        assert!(item.published_time().is_none());
    }

    #[test]
    fn serpapi_source_as_string_or_object() {
        let plain: SerpApiNewsItem =
            serde_json::from_value(json!({ "source": "BBC", "link": "https://bbc.com/x" })).unwrap();
        assert_eq!(SearchHit::from(plain).source, "BBC");

        let nested: SerpApiNewsItem = serde_json::from_value(
            json!({ "source": { "name": "Forbes", "icon": "x.png" }, "link": "https://forbes.ua/x" }),
        )
        .unwrap();
        assert_eq!(SearchHit::from(nested).source, "Forbes");

        let missing: SerpApiNewsItem = serde_json::from_value(json!({})).unwrap();
        let hit = SearchHit::from(missing);
        assert_eq!(hit.source, "");
        assert!(hit.raw_date.is_none());
    }
}
