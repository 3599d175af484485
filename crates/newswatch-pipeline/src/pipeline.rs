//! Chainable stages over a [`ResultTable`].
//!
//! Each stage consumes the pipeline and hands it back, so a run reads as one
//! expression:
//!
//! ```ignore
//! let pipeline = Pipeline::new(table, config)
//!     .dedupe()
//!     .rename_persons(&names)
//!     .filter_relevant()
//!     .enrich(&chain)
//!     .await
//!     .classify(&classifier, ClassifierFailurePolicy::Retain)
//!     .await
//!     .sort_by_date(false)?;
//! ```
//!
//! Use [`Pipeline::fork`] to branch off a detached copy that leaves the
//! original untouched. Every stage records a [`StageReport`] and logs its row delta.

use std::sync::Arc;

use newswatch_core::{FilterConfig, PersonNameMap};

use crate::canonical;
use crate::classify::{self, ClassifierFailurePolicy, TextClassifier};
use crate::dates::normalize_date;
use crate::enrich::EnrichmentChain;
use crate::error::PipelineError;
use crate::filter::LinkFilter;
use crate::table::ResultTable;

/// Row counts around one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: &'static str,
    pub before: usize,
    pub after: usize,
}

impl StageReport {
    #[must_use]
    pub fn removed(&self) -> usize {
        self.before.saturating_sub(self.after)
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    table: ResultTable,
    config: Arc<FilterConfig>,
    reports: Vec<StageReport>,
}

impl Pipeline {
    #[must_use]
    pub fn new(table: ResultTable, config: Arc<FilterConfig>) -> Self {
        Self {
            table,
            config,
            reports: Vec::new(),
        }
    }

    #[must_use]
    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    #[must_use]
    pub fn into_table(self) -> ResultTable {
        self.table
    }

    #[must_use]
    pub fn reports(&self) -> &[StageReport] {
        &self.reports
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Detached copy sharing only the read-only config.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Keep the first row per link.
    #[must_use]
    pub fn dedupe(self) -> Self {
        self.apply("dedupe", canonical::dedupe)
    }

    /// Rewrite subjects to their canonical spelling.
    #[must_use]
    pub fn rename_persons(self, names: &PersonNameMap) -> Self {
        self.apply("rename_persons", |table| canonical::rename_persons(table, names))
    }

    /// Drop rows whose link contains any configured `links_to_remove` entry.
    #[must_use]
    pub fn remove_configured_links(self) -> Self {
        let patterns = self.config.links_to_remove.clone();
        self.remove_by_links(&patterns)
    }

    /// Drop rows whose link contains any of `patterns`.
    #[must_use]
    pub fn remove_by_links(self, patterns: &[String]) -> Self {
        self.apply("remove_by_links", |table| {
            canonical::remove_by_links(table, patterns)
        })
    }

    /// Drop rows with blacklisted domains, URL stop words, or title stop words.
    #[must_use]
    pub fn filter_relevant(self) -> Self {
        let filter = LinkFilter::new(Arc::clone(&self.config));
        self.apply("filter_relevant", |table| {
            table.retain(|record| filter.is_relevant_record(record))
        })
    }

    /// Normalize every date without fetching anything.
    #[must_use]
    pub fn normalize_dates(mut self) -> Self {
        for record in self.table.rows_mut() {
            record.date = normalize_date(record.date.as_deref());
        }
        let count = self.table.len();
        self.record("normalize_dates", count)
    }

    /// Fill body text and dates through `chain`.
    pub async fn enrich(mut self, chain: &EnrichmentChain) -> Self {
        let before = self.table.len();
        let (table, _summary) = chain.enrich_table(self.table).await;
        self.table = table;
        self.record("enrich", before)
    }

    /// Drop rows the classifier rejects.
    pub async fn classify(
        mut self,
        classifier: &dyn TextClassifier,
        policy: ClassifierFailurePolicy,
    ) -> Self {
        let before = self.table.len();
        let (table, report) = classify::classify(self.table, classifier, policy).await;
        tracing::info!(
            checked = report.checked,
            rejected = report.rejected,
            undecided = report.undecided,
            without_text = report.skipped_without_text,
            "classification complete"
        );
        self.table = table;
        self.record("classify", before)
    }

    /// Sort by the `Date` column; missing dates last.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownColumn`] if the table has no date column.
    pub fn sort_by_date(self, ascending: bool) -> Result<Self, PipelineError> {
        self.sort_by("Date", ascending)
    }

    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownColumn`] for a column the table lacks.
    pub fn sort_by(self, column: &str, ascending: bool) -> Result<Self, PipelineError> {
        self.sort_by_columns(&[(column, ascending)])
    }

    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownColumn`] for a column the table lacks;
    /// the table is left unsorted.
    pub fn sort_by_columns(mut self, keys: &[(&str, bool)]) -> Result<Self, PipelineError> {
        let before = self.table.len();
        self.table = self.table.sort_by_columns(keys)?;
        Ok(self.record("sort", before))
    }

    fn apply(mut self, stage: &'static str, op: impl FnOnce(ResultTable) -> ResultTable) -> Self {
        let before = self.table.len();
        self.table = op(self.table);
        self.record(stage, before)
    }

    fn record(mut self, stage: &'static str, before: usize) -> Self {
        let report = StageReport {
            stage,
            before,
            after: self.table.len(),
        };
        tracing::info!(
            stage,
            before = report.before,
            after = report.after,
            removed = report.removed(),
            "stage complete"
        );
        self.reports.push(report);
        self
    }
}

#[cfg(test)]
mod tests {
    use newswatch_core::SearchResultRecord;

    use super::*;

    fn config() -> Arc<FilterConfig> {
        Arc::new(FilterConfig {
            blacklisted_domains: vec!["kse.ua".to_string()],
            url_stop_words: vec!["login".to_string()],
            links_to_remove: vec![".pdf".to_string()],
            ..FilterConfig::default()
        })
    }

    fn row(person: &str, link: &str, title: &str) -> SearchResultRecord {
        SearchResultRecord::new(person, link, title, "", None)
    }

    #[test]
    fn stages_chain_and_report_deltas() {
        let table = ResultTable::new(vec![
            row("a", "https://example.com/1", ""),
            row("a", "https://example.com/1", ""),
            row("a", "https://kse.ua/x", ""),
            row("a", "https://example.com/report.pdf", ""),
            row("a", "https://example.com/login", ""),
        ]);

        let pipeline = Pipeline::new(table, config())
            .dedupe()
            .remove_configured_links()
            .filter_relevant();

        assert_eq!(pipeline.table().len(), 1);
        let stages: Vec<(&str, usize, usize)> = pipeline
            .reports()
            .iter()
            .map(|r| (r.stage, r.before, r.after))
            .collect();
        assert_eq!(
            stages,
            vec![
                ("dedupe", 5, 4),
                ("remove_by_links", 4, 3),
                ("filter_relevant", 3, 1),
            ]
        );
    }

    #[test]
    fn fork_leaves_original_untouched() {
        let table = ResultTable::new(vec![
            row("a", "https://example.com/1", ""),
            row("a", "https://kse.ua/x", ""),
        ]);
        let original = Pipeline::new(table, config());
        let filtered = original.fork().filter_relevant();

        assert_eq!(original.table().len(), 2);
        assert!(original.reports().is_empty());
        assert_eq!(filtered.table().len(), 1);
    }

    #[test]
    fn sort_by_unknown_column_fails_immediately() {
        let table = ResultTable::new(vec![row("a", "https://example.com/1", "")]);
        let err = Pipeline::new(table, config())
            .sort_by("Title text", true)
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownColumn(_)));
    }

    #[test]
    fn normalize_dates_truncates_without_fetching() {
        let mut record = row("a", "https://example.com/1", "");
        record.date = Some("2023-05-01T10:00:00Z".to_string());
        let pipeline = Pipeline::new(ResultTable::new(vec![record]), config()).normalize_dates();
        assert_eq!(pipeline.table().rows()[0].date.as_deref(), Some("2023-05-01"));
    }
}
