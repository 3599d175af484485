//! Link relevance predicate over blacklisted domains and stop words.
//!
//! Pure string matching: no network access, no error path. Anything that does
//! not parse as an absolute URL with a host is treated as irrelevant.

use std::sync::Arc;

use newswatch_core::{FilterConfig, SearchResultRecord};
use reqwest::Url;

/// Decides whether a search hit is worth keeping.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    config: Arc<FilterConfig>,
    /// Blacklist entries in the ASCII (punycode) form hosts are compared in.
    blacklist: Vec<String>,
}

impl LinkFilter {
    #[must_use]
    pub fn new(config: Arc<FilterConfig>) -> Self {
        let blacklist = config
            .blacklisted_domains
            .iter()
            .map(|entry| ascii_domain(entry))
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { config, blacklist }
    }

    /// `true` unless the URL's domain is blacklisted or the URL contains a stop word.
    #[must_use]
    pub fn is_relevant(&self, url: &str) -> bool {
        let lowered = url.trim().to_lowercase();
        let Some(domain) = domain_of(&lowered) else {
            return false;
        };
        if self.is_domain_blacklisted(&domain) {
            return false;
        }
        !self
            .config
            .url_stop_words
            .iter()
            .filter(|w| !w.is_empty())
            .any(|w| lowered.contains(&w.to_lowercase()))
    }

    /// URL check plus the optional title stop-word check.
    #[must_use]
    pub fn is_relevant_record(&self, record: &SearchResultRecord) -> bool {
        if !self.is_relevant(&record.link) {
            return false;
        }
        if self.config.title_stop_words.is_empty() {
            return true;
        }
        let title = record.title.to_lowercase();
        !self
            .config
            .title_stop_words
            .iter()
            .filter(|w| !w.is_empty())
            .any(|w| title.contains(&w.to_lowercase()))
    }

    /// Three-way match of an already lower-cased, `www.`-stripped domain:
    /// equal to an entry, a subdomain of it (`sub.entry`), or starting with
    /// `entry.` (entry anchored on the left). Internationalized domains are
    /// compared in punycode.
    #[must_use]
    pub fn is_domain_blacklisted(&self, domain: &str) -> bool {
        let domain = ascii_domain(domain);
        let domain = domain.as_str();
        self.blacklist.iter().any(|entry| {
            let entry = entry.as_str();
            domain == entry
                || domain
                    .strip_suffix(entry)
                    .is_some_and(|rest| rest.ends_with('.'))
                || domain
                    .strip_prefix(entry)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

/// Lower-cased ASCII form of a bare domain or dotted fragment.
///
/// Unicode labels become punycode (`приклад.укр` -> `xn--80aikifvh.xn--j1amh`),
/// matching what [`domain_of`] yields for the same host. Fragments that are
/// not valid hosts on their own are returned lower-cased as written.
fn ascii_domain(entry: &str) -> String {
    let entry = entry.trim().to_lowercase();
    if entry.is_ascii() {
        return entry;
    }
    Url::parse(&format!("http://{entry}/"))
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or(entry)
}

/// Lower-cased host with any leading `www.` removed.
#[must_use]
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}
