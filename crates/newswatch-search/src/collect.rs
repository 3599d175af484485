//! Run every roster query against every configured provider.
//!
//! Provider failures for a single query are logged and skipped so one bad
//! response does not abort the whole collection.

use std::time::Duration;

use async_trait::async_trait;
use newswatch_core::SearchResultRecord;

use crate::error::SearchError;
use crate::types::SearchHit;

/// A search backend that turns a query into result hits.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError>;
}

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub max_results: u32,
    /// Pause between consecutive provider calls.
    pub inter_query_delay: Duration,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_results: 100,
            inter_query_delay: Duration::ZERO,
        }
    }
}

/// Query every provider for every entry in `queries` and flatten the hits into
/// raw records tagged with the query as `person`.
///
/// Output is query-major: all rows for the first query come first, in provider
/// order. A query with no hits from any provider yields one placeholder row
/// (empty link) so the raw export shows which subjects returned nothing.
///
/// # Errors
///
/// - [`SearchError::EmptyQueryList`] if `queries` is empty.
/// - [`SearchError::NoProviders`] if `providers` is empty.
pub async fn collect_results(
    providers: &[Box<dyn SearchProvider>],
    queries: &[String],
    options: &CollectOptions,
) -> Result<Vec<SearchResultRecord>, SearchError> {
    if queries.is_empty() {
        return Err(SearchError::EmptyQueryList);
    }
    if providers.is_empty() {
        return Err(SearchError::NoProviders);
    }

    let mut records = Vec::new();
    let mut failed_calls = 0usize;
    let mut first_call = true;

    for (index, query) in queries.iter().enumerate() {
        tracing::info!(index = index + 1, total = queries.len(), query = %query, "collecting");
        let before = records.len();

        for provider in providers {
            if !first_call && !options.inter_query_delay.is_zero() {
                tokio::time::sleep(options.inter_query_delay).await;
            }
            first_call = false;

            match provider.search(query, options.max_results).await {
                Ok(hits) => {
                    records.extend(hits.into_iter().map(|hit| {
                        SearchResultRecord::new(
                            query.clone(),
                            hit.link,
                            hit.title,
                            hit.source,
                            hit.raw_date,
                        )
                    }));
                }
                Err(e) => {
                    failed_calls += 1;
                    tracing::warn!(
                        provider = provider.name(),
                        query = %query,
                        error = %e,
                        "search failed; continuing"
                    );
                }
            }
        }

        if records.len() == before {
            tracing::info!(query = %query, "no results");
            records.push(SearchResultRecord::empty_for(query.clone()));
        }
    }

    tracing::info!(
        queries = queries.len(),
        records = records.len(),
        failed_calls,
        "collection complete"
    );
    Ok(records)
}
