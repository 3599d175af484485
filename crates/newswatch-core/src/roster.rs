use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::names::PersonNameMap;
use crate::ConfigError;

/// The roster file: who to search for and how to clean up what comes back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterFile {
    /// Search queries, one per subject spelling.
    pub queries: Vec<String>,
    /// Raw spelling -> canonical spelling.
    #[serde(default)]
    pub rewrite_names: BTreeMap<String, String>,
    #[serde(default)]
    pub blacklisted_domains: Vec<String>,
    #[serde(default)]
    pub url_stop_words: Vec<String>,
    #[serde(default)]
    pub title_stop_words: Vec<String>,
    #[serde(default)]
    pub links_to_remove: Vec<String>,
}

impl RosterFile {
    /// Validated person-name mapping built from `rewrite_names`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the mapping contains a cycle.
    pub fn name_map(&self) -> Result<PersonNameMap, ConfigError> {
        PersonNameMap::new(self.rewrite_names.clone())
    }
}

/// Load, normalize, and validate the roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_roster(path: &Path) -> Result<RosterFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RosterFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_roster(&content)
}

/// Parse, normalize, and validate roster YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_roster(yaml: &str) -> Result<RosterFile, ConfigError> {
    let mut roster: RosterFile = serde_yaml::from_str(yaml)?;
    normalize_roster(&mut roster);
    validate_roster(&roster)?;
    Ok(roster)
}

/// Lower-case, trim, and strip a leading `www.` from a blacklist entry.
#[must_use]
pub fn normalize_domain_entry(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    lower
        .strip_prefix("www.")
        .map_or_else(|| lower.clone(), str::to_string)
}

fn normalize_roster(roster: &mut RosterFile) {
    roster.queries = dedup_preserving_order(
        roster.queries.iter().map(|q| q.trim().to_string()),
    );
    roster.blacklisted_domains = dedup_preserving_order(
        roster
            .blacklisted_domains
            .iter()
            .map(|d| normalize_domain_entry(d))
            .filter(|d| !d.is_empty()),
    );
    roster.url_stop_words = normalize_words(&roster.url_stop_words);
    roster.title_stop_words = normalize_words(&roster.title_stop_words);
    roster.links_to_remove = dedup_preserving_order(
        roster
            .links_to_remove
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
    );
}

fn normalize_words(words: &[String]) -> Vec<String> {
    dedup_preserving_order(
        words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty()),
    )
}

fn dedup_preserving_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

fn validate_roster(roster: &RosterFile) -> Result<(), ConfigError> {
    if roster.queries.is_empty() {
        return Err(ConfigError::Validation(
            "roster must contain at least one query".to_string(),
        ));
    }

    if roster.queries.iter().any(String::is_empty) {
        return Err(ConfigError::Validation(
            "roster queries must be non-empty".to_string(),
        ));
    }

    for (raw, canonical) in &roster.rewrite_names {
        if raw.trim().is_empty() || canonical.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "rewrite_names entry '{raw}' -> '{canonical}' must have non-empty names"
            )));
        }
    }

    roster.name_map()?;

    Ok(())
}

#[cfg(test)]
#[path = "roster_test.rs"]
mod tests;
