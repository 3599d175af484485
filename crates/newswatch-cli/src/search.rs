//! `search` command: roster queries against the configured providers.

use std::time::Duration;

use newswatch_core::{AppConfig, RosterFile};
use newswatch_pipeline::ResultTable;
use newswatch_search::{
    collect_results, CollectOptions, GoogleSearchClient, NewsSearchClient, SearchProvider,
    SearchSettings,
};

use crate::{ProviderChoice, SearchOptions};

/// Build the providers selected by `choice`.
///
/// An explicitly requested provider without credentials is an error. `All`
/// takes every provider whose credentials are present and fails only if
/// there are none.
pub(crate) fn build_providers(
    config: &AppConfig,
    choice: ProviderChoice,
    sort_by_date: bool,
) -> anyhow::Result<Vec<Box<dyn SearchProvider>>> {
    let settings = SearchSettings::from_app_config(config);
    let mut providers: Vec<Box<dyn SearchProvider>> = Vec::new();

    let want_google = matches!(choice, ProviderChoice::Google | ProviderChoice::All);
    let want_news = matches!(choice, ProviderChoice::News | ProviderChoice::All);

    if want_google {
        match config.google_credentials() {
            Ok((key, engine)) => providers.push(Box::new(
                GoogleSearchClient::new(key, engine, settings.clone())?.sort_by_date(sort_by_date),
            )),
            Err(e) if choice == ProviderChoice::Google => return Err(e.into()),
            Err(e) => tracing::warn!(error = %e, "Google search not configured; skipping"),
        }
    }

    if want_news {
        match config.serpapi_key() {
            Ok(key) => providers.push(Box::new(NewsSearchClient::new(key, settings)?)),
            Err(e) if choice == ProviderChoice::News => return Err(e.into()),
            Err(e) => tracing::warn!(error = %e, "news search not configured; skipping"),
        }
    }

    if providers.is_empty() {
        anyhow::bail!(
            "no search provider configured; set GOOGLE_API_KEY and GOOGLE_SEARCH_ENGINE_ID, or SERPAPI_API_KEY"
        );
    }
    Ok(providers)
}

/// Run every roster query and return the raw table.
///
/// # Errors
///
/// Fails on missing credentials or an empty query list. Individual provider
/// failures are logged by the collector and do not abort the run.
pub(crate) async fn run_search(
    config: &AppConfig,
    roster: &RosterFile,
    options: &SearchOptions,
) -> anyhow::Result<ResultTable> {
    let providers = build_providers(config, options.provider, options.sort_by_date)?;
    let names: Vec<&'static str> = providers.iter().map(|p| p.name()).collect();
    tracing::info!(providers = ?names, queries = roster.queries.len(), "search started");

    let collect_options = CollectOptions {
        max_results: config.max_results_per_query,
        inter_query_delay: Duration::from_millis(config.inter_query_delay_ms),
    };
    let records = collect_results(&providers, &roster.queries, &collect_options).await?;

    println!(
        "collected {} rows for {} queries",
        records.len(),
        roster.queries.len()
    );
    Ok(ResultTable::new(records))
}
