//! Per-record fallback chain that fills in missing body text and publish date.
//!
//! Strategies run in order. A field, once filled, is never overwritten, and a
//! strategy whose target fields are all filled is skipped. Failures are logged
//! and treated as "nothing found"; nothing here returns an error to the caller.

mod strategies;

use async_trait::async_trait;
use newswatch_core::{FilterConfig, SearchResultRecord};

use crate::dates::normalize_date;
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::html::truncate_chars;
use crate::table::{Column, ResultTable};

pub use strategies::{ArticleExtractor, DateHeuristic, PageTextFetcher};

/// Which record fields a strategy can fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Targets {
    pub text: bool,
    pub date: bool,
}

impl Targets {
    pub const TEXT: Self = Self {
        text: true,
        date: false,
    };
    pub const DATE: Self = Self {
        text: false,
        date: true,
    };
    pub const BOTH: Self = Self {
        text: true,
        date: true,
    };
}

/// What a strategy found for one link. Dates are `YYYY-MM-DD` or raw text;
/// the chain normalizes them afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Harvest {
    pub text: Option<String>,
    pub date: Option<String>,
}

/// Which fields one strategy attempt actually filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptResult {
    pub text_found: bool,
    pub date_found: bool,
}

/// One source of body text and/or publish date.
///
/// `Ok(Some(_))` is a hit, `Ok(None)` means nothing was found, and `Err` is a
/// failed fetch or parse. Timeouts are the strategy's own responsibility.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn targets(&self) -> Targets;

    async fn harvest(&self, link: &str) -> Result<Option<Harvest>, FetchError>;
}

/// Totals for one pass over a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub processed: usize,
    pub skipped_without_link: usize,
    pub text_filled: usize,
    pub date_filled: usize,
}

pub struct EnrichmentChain {
    strategies: Vec<Box<dyn Strategy>>,
    max_text_length: usize,
}

impl EnrichmentChain {
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn Strategy>>, max_text_length: usize) -> Self {
        Self {
            strategies,
            max_text_length,
        }
    }

    /// Article extractor, then generic page text, then the date heuristic,
    /// each bounded by its configured timeout.
    #[must_use]
    pub fn standard(fetcher: &PageFetcher, config: &FilterConfig) -> Self {
        Self::new(
            vec![
                Box::new(ArticleExtractor::new(fetcher.clone(), config.timeouts.article)),
                Box::new(PageTextFetcher::new(fetcher.clone(), config.timeouts.page_text)),
                Box::new(DateHeuristic::new(fetcher.clone(), config.timeouts.date)),
            ],
            config.max_text_length,
        )
    }

    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run one strategy against `record`, filling only fields that are still empty.
    pub async fn attempt(
        &self,
        strategy: &dyn Strategy,
        record: &mut SearchResultRecord,
    ) -> AttemptResult {
        let harvest = match strategy.harvest(&record.link).await {
            Ok(Some(harvest)) => harvest,
            Ok(None) => {
                tracing::debug!(strategy = strategy.name(), link = %record.link, "nothing found");
                return AttemptResult::default();
            }
            Err(e) => {
                tracing::warn!(
                    strategy = strategy.name(),
                    link = %record.link,
                    error = %e,
                    "enrichment strategy failed"
                );
                return AttemptResult::default();
            }
        };

        let targets = strategy.targets();
        let mut result = AttemptResult::default();

        if targets.text && record.body_text.is_none() {
            if let Some(text) = harvest.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                let truncated = truncate_chars(text, self.max_text_length);
                if !truncated.is_empty() {
                    record.body_text = Some(truncated);
                    result.text_found = true;
                }
            }
        }
        if targets.date && record.date.is_none() {
            if let Some(date) = harvest.date.filter(|d| !d.trim().is_empty()) {
                record.date = Some(date);
                result.date_found = true;
            }
        }
        result
    }

    /// Fill `record` from the strategies in order, then normalize its date.
    ///
    /// Records without a link are left untouched.
    pub async fn enrich_record(&self, record: &mut SearchResultRecord) -> AttemptResult {
        let mut total = AttemptResult::default();
        if !record.has_link() {
            tracing::debug!(person = %record.person, "no link, skipping enrichment");
            return total;
        }

        for strategy in &self.strategies {
            if record.is_fully_enriched() {
                break;
            }
            let targets = strategy.targets();
            let needed = (targets.text && record.body_text.is_none())
                || (targets.date && record.date.is_none());
            if !needed {
                tracing::debug!(strategy = strategy.name(), "targets already filled, skipping");
                continue;
            }

            let found = self.attempt(strategy.as_ref(), record).await;
            total.text_found |= found.text_found;
            total.date_found |= found.date_found;
        }

        record.date = normalize_date(record.date.as_deref());
        total
    }

    /// Enrich every row in order and add the body-text column to the table.
    pub async fn enrich_table(&self, mut table: ResultTable) -> (ResultTable, EnrichmentSummary) {
        let total = table.len();
        let mut summary = EnrichmentSummary::default();

        tracing::info!(total, strategies = ?self.strategy_names(), "enrichment started");

        for (index, record) in table.rows_mut().iter_mut().enumerate() {
            if !record.has_link() {
                summary.skipped_without_link += 1;
                tracing::info!(index = index + 1, total, "no link value for this row");
                continue;
            }
            tracing::info!(index = index + 1, total, link = %record.link, "enriching");

            let found = self.enrich_record(record).await;
            summary.processed += 1;
            summary.text_filled += usize::from(found.text_found);
            summary.date_filled += usize::from(found.date_found);
        }

        table.add_column(Column::BodyText);
        tracing::info!(
            processed = summary.processed,
            skipped = summary.skipped_without_link,
            text_filled = summary.text_filled,
            date_filled = summary.date_filled,
            "enrichment complete"
        );
        (table, summary)
    }
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;
