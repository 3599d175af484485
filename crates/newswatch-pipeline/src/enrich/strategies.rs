use std::time::Duration;

use async_trait::async_trait;

use super::{Harvest, Strategy, Targets};
use crate::dates::{date_from_url, format_date};
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::html::{
    extract_article_body, extract_published_date, extract_time_element_date, page_text,
};

/// Downloads the page once and pulls both the article body and a structured
/// publish date out of it.
pub struct ArticleExtractor {
    fetcher: PageFetcher,
    timeout: Duration,
}

impl ArticleExtractor {
    #[must_use]
    pub fn new(fetcher: PageFetcher, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }
}

#[async_trait]
impl Strategy for ArticleExtractor {
    fn name(&self) -> &'static str {
        "article"
    }

    fn targets(&self) -> Targets {
        Targets::BOTH
    }

    async fn harvest(&self, link: &str) -> Result<Option<Harvest>, FetchError> {
        let Some(html) = self.fetcher.fetch_html(link, self.timeout).await? else {
            return Ok(None);
        };
        let harvest = Harvest {
            text: extract_article_body(&html),
            date: extract_published_date(&html).map(format_date),
        };
        if harvest.text.is_none() && harvest.date.is_none() {
            return Ok(None);
        }
        Ok(Some(harvest))
    }
}

/// Whole-page visible text as a last resort for the body.
pub struct PageTextFetcher {
    fetcher: PageFetcher,
    timeout: Duration,
}

impl PageTextFetcher {
    #[must_use]
    pub fn new(fetcher: PageFetcher, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }
}

#[async_trait]
impl Strategy for PageTextFetcher {
    fn name(&self) -> &'static str {
        "page_text"
    }

    fn targets(&self) -> Targets {
        Targets::TEXT
    }

    async fn harvest(&self, link: &str) -> Result<Option<Harvest>, FetchError> {
        let Some(html) = self.fetcher.fetch_html(link, self.timeout).await? else {
            return Ok(None);
        };
        let text = page_text(&html);
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(Harvest {
            text: Some(text),
            date: None,
        }))
    }
}

/// Date-only heuristics: a date in the URL path wins without any request;
/// otherwise the page's meta tags, JSON-LD, and `<time>` elements are tried.
pub struct DateHeuristic {
    fetcher: PageFetcher,
    timeout: Duration,
}

impl DateHeuristic {
    #[must_use]
    pub fn new(fetcher: PageFetcher, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }
}

#[async_trait]
impl Strategy for DateHeuristic {
    fn name(&self) -> &'static str {
        "date_heuristic"
    }

    fn targets(&self) -> Targets {
        Targets::DATE
    }

    async fn harvest(&self, link: &str) -> Result<Option<Harvest>, FetchError> {
        let found = match date_from_url(link) {
            Some(date) => Some(date),
            None => match self.fetcher.fetch_html(link, self.timeout).await? {
                Some(html) => {
                    extract_published_date(&html).or_else(|| extract_time_element_date(&html))
                }
                None => None,
            },
        };
        Ok(found.map(|date| Harvest {
            text: None,
            date: Some(format_date(date)),
        }))
    }
}
