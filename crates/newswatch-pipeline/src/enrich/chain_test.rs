use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;

/// Scripted strategy that records how often it was asked.
struct MockStrategy {
    name: &'static str,
    targets: Targets,
    outcome: Outcome,
    calls: Arc<AtomicUsize>,
}

#[derive(Clone)]
enum Outcome {
    Found(Harvest),
    NotFound,
    Failed,
}

impl MockStrategy {
    fn new(name: &'static str, targets: Targets, outcome: Outcome) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                targets,
                outcome,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl Strategy for MockStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn targets(&self) -> Targets {
        self.targets
    }

    async fn harvest(&self, _link: &str) -> Result<Option<Harvest>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Found(h) => Ok(Some(h.clone())),
            Outcome::NotFound => Ok(None),
            Outcome::Failed => Err(FetchError::Malformed("scripted failure".to_string())),
        }
    }
}

fn found(text: Option<&str>, date: Option<&str>) -> Outcome {
    Outcome::Found(Harvest {
        text: text.map(str::to_string),
        date: date.map(str::to_string),
    })
}

fn record(link: &str) -> SearchResultRecord {
    SearchResultRecord::new("Roman Neyter", link, "title", "example.com", None)
}

#[tokio::test]
async fn first_strategy_filling_both_fields_short_circuits_the_rest() {
    let (first, first_calls) = MockStrategy::new(
        "rich",
        Targets::BOTH,
        found(Some("article body"), Some("2023-05-01T10:00:00Z")),
    );
    let (second, second_calls) = MockStrategy::new("text", Targets::TEXT, found(Some("x"), None));
    let (third, third_calls) =
        MockStrategy::new("date", Targets::DATE, found(None, Some("2020-01-01")));
    let chain = EnrichmentChain::new(vec![Box::new(first), Box::new(second), Box::new(third)], 1500);

    let mut row = record("https://example.com/a");
    let result = chain.enrich_record(&mut row).await;

    assert!(result.text_found && result.date_found);
    assert_eq!(row.body_text.as_deref(), Some("article body"));
    assert_eq!(row.date.as_deref(), Some("2023-05-01"));
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    assert_eq!(third_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn later_strategies_fill_only_missing_fields() {
    let (first, _) = MockStrategy::new("rich", Targets::BOTH, found(Some("from rich"), None));
    let (second, second_calls) =
        MockStrategy::new("text", Targets::TEXT, found(Some("from text"), None));
    let (third, third_calls) =
        MockStrategy::new("date", Targets::DATE, found(None, Some("2021-02-03")));
    let chain = EnrichmentChain::new(vec![Box::new(first), Box::new(second), Box::new(third)], 1500);

    let mut row = record("https://example.com/a");
    chain.enrich_record(&mut row).await;

    assert_eq!(row.body_text.as_deref(), Some("from rich"));
    assert_eq!(row.date.as_deref(), Some("2021-02-03"));
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    assert_eq!(third_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn existing_date_is_never_overwritten() {
    let (first, _) = MockStrategy::new(
        "rich",
        Targets::BOTH,
        found(Some("body"), Some("2019-09-09")),
    );
    let (date, date_calls) =
        MockStrategy::new("date", Targets::DATE, found(None, Some("2018-08-08")));
    let chain = EnrichmentChain::new(vec![Box::new(first), Box::new(date)], 1500);

    let mut row = record("https://example.com/a");
    row.date = Some("2023-05-01T10:00:00Z".to_string());
    chain.enrich_record(&mut row).await;

    assert_eq!(row.date.as_deref(), Some("2023-05-01"));
    assert_eq!(row.body_text.as_deref(), Some("body"));
    assert_eq!(date_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failures_fall_through_to_the_next_strategy() {
    let (first, first_calls) = MockStrategy::new("rich", Targets::BOTH, Outcome::Failed);
    let (second, _) = MockStrategy::new("text", Targets::TEXT, Outcome::NotFound);
    let (third, _) = MockStrategy::new("date", Targets::DATE, found(None, Some("2022-10-10")));
    let chain = EnrichmentChain::new(vec![Box::new(first), Box::new(second), Box::new(third)], 1500);

    let mut row = record("https://example.com/a");
    let result = chain.enrich_record(&mut row).await;

    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert!(!result.text_found);
    assert!(result.date_found);
    assert!(row.body_text.is_none());
    assert_eq!(row.date.as_deref(), Some("2022-10-10"));
}

#[tokio::test]
async fn body_text_is_truncated_to_max_length() {
    let long = "ї".repeat(50);
    let (first, _) = MockStrategy::new("text", Targets::TEXT, found(Some(&long), None));
    let chain = EnrichmentChain::new(vec![Box::new(first)], 10);

    let mut row = record("https://example.com/a");
    chain.enrich_record(&mut row).await;

    assert_eq!(row.body_text.as_deref().map(|t| t.chars().count()), Some(10));
}

#[tokio::test]
async fn harvest_for_untargeted_field_is_ignored() {
    let (text_only, _) =
        MockStrategy::new("text", Targets::TEXT, found(Some("body"), Some("2020-01-01")));
    let chain = EnrichmentChain::new(vec![Box::new(text_only)], 1500);

    let mut row = record("https://example.com/a");
    chain.enrich_record(&mut row).await;

    assert_eq!(row.body_text.as_deref(), Some("body"));
    assert!(row.date.is_none());
}

#[tokio::test]
async fn rows_without_link_are_left_untouched() {
    let (first, calls) = MockStrategy::new("rich", Targets::BOTH, found(Some("x"), Some("2020-01-01")));
    let chain = EnrichmentChain::new(vec![Box::new(first)], 1500);

    let mut placeholder = SearchResultRecord::empty_for("Roman Neyter");
    placeholder.date = Some("2023-05-01T10:00:00Z".to_string());
    let before = placeholder.clone();
    chain.enrich_record(&mut placeholder).await;

    assert_eq!(placeholder, before);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn enrich_table_reports_summary_and_adds_body_column() {
    let (first, calls) = MockStrategy::new("rich", Targets::BOTH, found(Some("body"), None));
    let chain = EnrichmentChain::new(vec![Box::new(first)], 1500);

    let table = ResultTable::new(vec![
        record("https://example.com/a"),
        SearchResultRecord::empty_for("Nobody"),
        record("https://example.com/b"),
    ]);
    let (table, summary) = chain.enrich_table(table).await;

    assert_eq!(
        summary,
        EnrichmentSummary {
            processed: 2,
            skipped_without_link: 1,
            text_filled: 2,
            date_filled: 0,
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(table.has_column(Column::BodyText));
    assert!(table.rows()[1].body_text.is_none());
}

#[tokio::test]
async fn all_strategies_failing_leaves_fields_empty() {
    let (first, _) = MockStrategy::new("rich", Targets::BOTH, Outcome::Failed);
    let (second, _) = MockStrategy::new("text", Targets::TEXT, Outcome::Failed);
    let (third, _) = MockStrategy::new("date", Targets::DATE, Outcome::Failed);
    let chain = EnrichmentChain::new(vec![Box::new(first), Box::new(second), Box::new(third)], 1500);

    let table = ResultTable::new(vec![record("https://example.com/a")]);
    let (table, summary) = chain.enrich_table(table).await;

    assert_eq!(table.len(), 1);
    assert!(table.rows()[0].body_text.is_none());
    assert!(table.rows()[0].date.is_none());
    assert_eq!(summary.processed, 1);
}
