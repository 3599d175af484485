//! Person-name canonicalization mapping.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::ConfigError;

/// Raw-spelling to canonical-spelling mapping for roster subjects.
///
/// Chains are followed to their end (`a -> b`, `b -> c` resolves `a` to `c`),
/// which keeps renaming idempotent. Cycles are rejected at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonNameMap {
    map: BTreeMap<String, String>,
}

impl PersonNameMap {
    /// Build a mapping, rejecting cycles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if following the mapping from any
    /// key revisits a name other than a self-mapping.
    pub fn new(map: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        for start in map.keys() {
            let mut seen: HashSet<&str> = HashSet::new();
            seen.insert(start.as_str());
            let mut current = start.as_str();
            while let Some(next) = map.get(current) {
                if next == current {
                    break;
                }
                if !seen.insert(next.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "rewrite_names contains a cycle through '{start}'"
                    )));
                }
                current = next.as_str();
            }
        }
        Ok(Self { map })
    }

    /// Build a mapping from `(raw, canonical)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`PersonNameMap::new`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Canonical spelling for `name`; names without a mapping pass through unchanged.
    #[must_use]
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        // Acyclic by construction, so the walk ends within `len` steps.
        for _ in 0..=self.map.len() {
            match self.map.get(current) {
                Some(next) if next != current => current = next.as_str(),
                _ => break,
            }
        }
        current
    }

    /// Set of spellings every mapped name resolves to.
    #[must_use]
    pub fn canonical_names(&self) -> BTreeSet<&str> {
        self.map.keys().map(|k| self.canonical(k)).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}
