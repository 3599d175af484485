//! Shared types and configuration for newswatch.
//!
//! Holds the working-table row type, the per-run filter configuration, the
//! environment-driven application config, and the roster file (queries,
//! name rewrites, blacklists) that drives a collection run.

pub mod app_config;
pub mod config;
pub mod error;
pub mod filter_config;
pub mod names;
pub mod record;
pub mod roster;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use filter_config::{FilterConfig, StrategyTimeouts, DEFAULT_MAX_TEXT_LENGTH};
pub use names::PersonNameMap;
pub use record::SearchResultRecord;
pub use roster::{load_roster, parse_roster, RosterFile};
