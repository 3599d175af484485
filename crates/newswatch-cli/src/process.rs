//! `process` command: the reconciliation and enrichment pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use newswatch_core::{AppConfig, FilterConfig, RosterFile};
use newswatch_pipeline::{
    export_to_path, ClassifierFailurePolicy, Column, EnrichmentChain, ExportLayout, LlmClassifier,
    PageFetcher, Pipeline, ResultTable,
};

use crate::ProcessOptions;

/// Error out before any network work if classification is requested
/// without a classifier key.
pub(crate) fn check_classifier_config(
    config: &AppConfig,
    options: &ProcessOptions,
) -> anyhow::Result<()> {
    if !options.skip_classify {
        config.llm_key()?;
    }
    Ok(())
}

pub(crate) fn failure_policy(options: &ProcessOptions) -> ClassifierFailurePolicy {
    if options.reject_on_classifier_error {
        ClassifierFailurePolicy::Reject
    } else {
        ClassifierFailurePolicy::Retain
    }
}

/// Dedupe, canonicalize, filter, enrich, classify, and sort `table`.
///
/// # Errors
///
/// Configuration errors only: a missing classifier key, an invalid rename
/// mapping, or a table without a `Date` column. Fetch and classifier
/// failures are logged per row and never abort the run.
pub(crate) async fn run_process(
    config: &AppConfig,
    roster: &RosterFile,
    table: ResultTable,
    options: &ProcessOptions,
) -> anyhow::Result<ResultTable> {
    check_classifier_config(config, options)?;
    let classifier = if options.skip_classify {
        None
    } else {
        Some(LlmClassifier::new(
            &config.llm_base_url,
            config.llm_key()?,
            &config.llm_model,
            Duration::from_secs(config.request_timeout_secs),
        )?)
    };

    let names = roster.name_map()?;
    let filter_config = Arc::new(FilterConfig::from_roster(roster, config));

    let mut pipeline = Pipeline::new(table, Arc::clone(&filter_config))
        .dedupe()
        .rename_persons(&names)
        .remove_configured_links()
        .filter_relevant();

    pipeline = if options.skip_enrich {
        pipeline.normalize_dates()
    } else {
        let fetcher = PageFetcher::new(&config.user_agent)?;
        let chain = EnrichmentChain::standard(&fetcher, &filter_config);
        pipeline.enrich(&chain).await
    };

    if let Some(classifier) = &classifier {
        pipeline = pipeline.classify(classifier, failure_policy(options)).await;
    }

    let pipeline = pipeline.sort_by_date(!options.descending)?;

    for report in pipeline.reports() {
        println!(
            "{:<16} {:>5} -> {:<5} (removed {})",
            report.stage,
            report.before,
            report.after,
            report.removed()
        );
    }
    Ok(pipeline.into_table())
}

/// Enriched layout once body text exists, raw layout otherwise.
pub(crate) fn layout_for(table: &ResultTable) -> ExportLayout {
    if table.has_column(Column::BodyText) {
        ExportLayout::Enriched
    } else {
        ExportLayout::Raw
    }
}

pub(crate) fn export_result(table: &ResultTable, output: &Path) -> anyhow::Result<()> {
    export_to_path(table, layout_for(table), output)?;
    println!("wrote {} rows to {}", table.len(), output.display());
    Ok(())
}
