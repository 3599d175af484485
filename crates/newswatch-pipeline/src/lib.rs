//! Reconciliation and enrichment pipeline for collected search results.
//!
//! Raw rows flow through deduplication, name canonicalization, the link
//! relevance filter, the enrichment chain (body text and publish date), and
//! the classifier gate before being sorted and exported. See [`Pipeline`].

pub mod canonical;
pub mod classify;
pub mod dates;
pub mod enrich;
pub mod error;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod html;
pub mod pipeline;
pub mod table;

mod html_jsonld;

pub use classify::{classify, ClassifierFailurePolicy, ClassifyReport, LlmClassifier, TextClassifier};
pub use dates::normalize_date;
pub use enrich::{
    ArticleExtractor, AttemptResult, DateHeuristic, EnrichmentChain, EnrichmentSummary, Harvest,
    PageTextFetcher, Strategy, Targets,
};
pub use error::{FetchError, PipelineError};
pub use export::{export_to_path, import_from_path, read_csv, write_csv, ExportLayout};
pub use fetch::PageFetcher;
pub use filter::LinkFilter;
pub use pipeline::{Pipeline, StageReport};
pub use table::{Column, ResultTable};
