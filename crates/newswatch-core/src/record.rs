use serde::{Deserialize, Serialize};

/// One row of the working table: a single search hit for a roster subject.
///
/// `link` is the identity used for deduplication and must not change once
/// enrichment has started. `date` and `body_text` start empty (or messy, for
/// `date`) and are filled by the enrichment chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    /// Query subject; rewritten to its canonical spelling by the canonicalizer.
    pub person: String,
    pub link: String,
    /// Original headline; may be empty.
    pub title: String,
    /// Publisher label or display domain.
    pub source: String,
    /// Publish date. `YYYY-MM-DD` once normalized, `None` if never resolved.
    pub date: Option<String>,
    /// Extracted page text, truncated to the configured maximum length.
    pub body_text: Option<String>,
}

impl SearchResultRecord {
    /// Build a raw record as it comes out of a search provider.
    ///
    /// Empty date strings are stored as `None`.
    #[must_use]
    pub fn new(
        person: impl Into<String>,
        link: impl Into<String>,
        title: impl Into<String>,
        source: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            person: person.into(),
            link: link.into(),
            title: title.into(),
            source: source.into(),
            date: date.filter(|d| !d.trim().is_empty()),
            body_text: None,
        }
    }

    /// Placeholder row for a query that produced no hits.
    #[must_use]
    pub fn empty_for(person: impl Into<String>) -> Self {
        Self {
            person: person.into(),
            ..Self::default()
        }
    }

    /// `true` when the row carries a non-blank link.
    #[must_use]
    pub fn has_link(&self) -> bool {
        !self.link.trim().is_empty()
    }

    /// `true` when both enrichable fields are filled.
    #[must_use]
    pub fn is_fully_enriched(&self) -> bool {
        self.date.is_some() && self.body_text.is_some()
    }
}
