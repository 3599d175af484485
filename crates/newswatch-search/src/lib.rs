//! Search-provider clients for newswatch.
//!
//! Issues one query per roster entry against Google Custom Search and the
//! `SerpApi` Google News endpoint, and turns every hit into a raw
//! [`newswatch_core::SearchResultRecord`] tagged with the query as `person`.

pub mod collect;
pub mod error;
pub mod google;
pub mod news;
pub mod types;

mod http;
mod rate_limit;

pub use collect::{collect_results, CollectOptions, SearchProvider};
pub use error::SearchError;
pub use google::GoogleSearchClient;
pub use news::NewsSearchClient;
pub use types::{SearchHit, SearchSettings};
