//! Immutable per-run configuration shared by every pipeline stage.

use std::time::Duration;

use crate::app_config::AppConfig;
use crate::roster::RosterFile;

/// Default body-text truncation length, in characters.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 1500;

/// Default timeout applied to each enrichment strategy's fetch.
pub const DEFAULT_STRATEGY_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-strategy fetch timeouts. Enforced by the fetcher, not the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyTimeouts {
    pub article: Duration,
    pub page_text: Duration,
    pub date: Duration,
}

impl StrategyTimeouts {
    /// Same timeout for every strategy.
    #[must_use]
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            article: timeout,
            page_text: timeout,
            date: timeout,
        }
    }
}

impl Default for StrategyTimeouts {
    fn default() -> Self {
        Self::uniform(DEFAULT_STRATEGY_TIMEOUT)
    }
}

/// Filter lists, timeouts, and truncation length for one pipeline run.
///
/// Built once per run and read-only afterwards; stages share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Bare domains or dotted subdomain fragments.
    pub blacklisted_domains: Vec<String>,
    /// Substrings rejected anywhere in the lower-cased URL.
    pub url_stop_words: Vec<String>,
    /// Substrings rejected anywhere in the lower-cased title. Empty disables the check.
    pub title_stop_words: Vec<String>,
    /// Literal link substrings removed by the link-removal stage.
    pub links_to_remove: Vec<String>,
    pub timeouts: StrategyTimeouts,
    pub max_text_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blacklisted_domains: Vec::new(),
            url_stop_words: Vec::new(),
            title_stop_words: Vec::new(),
            links_to_remove: Vec::new(),
            timeouts: StrategyTimeouts::default(),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }
}

impl FilterConfig {
    /// Combine the roster's lists with the app config's timeout and truncation length.
    #[must_use]
    pub fn from_roster(roster: &RosterFile, app: &AppConfig) -> Self {
        Self {
            blacklisted_domains: roster.blacklisted_domains.clone(),
            url_stop_words: roster.url_stop_words.clone(),
            title_stop_words: roster.title_stop_words.clone(),
            links_to_remove: roster.links_to_remove.clone(),
            timeouts: StrategyTimeouts::uniform(Duration::from_secs(app.request_timeout_secs)),
            max_text_length: app.max_text_length,
        }
    }
}
