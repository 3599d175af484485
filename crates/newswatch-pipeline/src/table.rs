//! In-memory working table of search results.

use std::cmp::Ordering;

use newswatch_core::SearchResultRecord;

use crate::error::PipelineError;

/// A named column of the working table.
///
/// Header names are part of the export contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Person,
    Title,
    Date,
    Source,
    Link,
    BodyText,
}

impl Column {
    /// Columns of a freshly collected table, in raw export order.
    pub const RAW: [Column; 5] = [
        Column::Person,
        Column::Title,
        Column::Date,
        Column::Source,
        Column::Link,
    ];

    /// Columns of the post-enrichment export, in order.
    pub const ENRICHED: [Column; 4] = [
        Column::Person,
        Column::Link,
        Column::Date,
        Column::BodyText,
    ];

    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::Person => "Person",
            Column::Title => "Title",
            Column::Date => "Date",
            Column::Source => "Source",
            Column::Link => "Link",
            Column::BodyText => "Title text",
        }
    }

    /// Look up a column by its exact header name.
    #[must_use]
    pub fn from_header(name: &str) -> Option<Self> {
        [
            Column::Person,
            Column::Title,
            Column::Date,
            Column::Source,
            Column::Link,
            Column::BodyText,
        ]
        .into_iter()
        .find(|c| c.header() == name)
    }

    fn value(self, record: &SearchResultRecord) -> Option<&str> {
        let raw = match self {
            Column::Person => Some(record.person.as_str()),
            Column::Title => Some(record.title.as_str()),
            Column::Date => record.date.as_deref(),
            Column::Source => Some(record.source.as_str()),
            Column::Link => Some(record.link.as_str()),
            Column::BodyText => record.body_text.as_deref(),
        };
        raw.filter(|v| !v.is_empty())
    }
}

/// The rows of one run plus the set of columns they currently carry.
///
/// A collected table has the raw columns; the body-text column appears once
/// enrichment has run (or when imported from an enriched export).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<SearchResultRecord>,
    columns: Vec<Column>,
}

impl ResultTable {
    /// Wrap collected rows; the table carries the raw columns.
    #[must_use]
    pub fn new(rows: Vec<SearchResultRecord>) -> Self {
        Self::with_columns(rows, Column::RAW.to_vec())
    }

    #[must_use]
    pub fn with_columns(rows: Vec<SearchResultRecord>, columns: Vec<Column>) -> Self {
        Self { rows, columns }
    }

    #[must_use]
    pub fn rows(&self) -> &[SearchResultRecord] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [SearchResultRecord] {
        &mut self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<SearchResultRecord> {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub(crate) fn add_column(&mut self, column: Column) {
        if !self.has_column(column) {
            self.columns.push(column);
        }
    }

    /// Keep only rows matching `keep`, preserving order.
    #[must_use]
    pub fn retain(mut self, keep: impl FnMut(&SearchResultRecord) -> bool) -> Self {
        self.rows.retain(keep);
        self
    }

    /// Resolve a header name against the columns this table carries.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownColumn`] if no such column exists here.
    pub fn column(&self, name: &str) -> Result<Column, PipelineError> {
        Column::from_header(name)
            .filter(|c| self.has_column(*c))
            .ok_or_else(|| PipelineError::UnknownColumn(name.to_string()))
    }

    /// Stable sort by one column. Empty values sort last in either direction.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownColumn`] before touching any row.
    pub fn sort_by(self, name: &str, ascending: bool) -> Result<Self, PipelineError> {
        self.sort_by_columns(&[(name, ascending)])
    }

    /// Stable multi-key sort; earlier keys take precedence.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownColumn`] if any key names a column the
    /// table does not carry. Every key is checked before sorting.
    pub fn sort_by_columns(mut self, keys: &[(&str, bool)]) -> Result<Self, PipelineError> {
        let resolved = keys
            .iter()
            .map(|(name, ascending)| self.column(name).map(|c| (c, *ascending)))
            .collect::<Result<Vec<_>, _>>()?;

        self.rows.sort_by(|a, b| {
            resolved
                .iter()
                .map(|(column, ascending)| compare_values(column.value(a), column.value(b), *ascending))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        Ok(self)
    }
}

fn compare_values(a: Option<&str>, b: Option<&str>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if ascending => a.cmp(b),
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(person: &str, link: &str, date: Option<&str>) -> SearchResultRecord {
        SearchResultRecord::new(person, link, "", "", date.map(str::to_string))
    }

    fn links(table: &ResultTable) -> Vec<&str> {
        table.rows().iter().map(|r| r.link.as_str()).collect()
    }

    #[test]
    fn headers_round_trip() {
        for column in Column::RAW.into_iter().chain(Column::ENRICHED) {
            assert_eq!(Column::from_header(column.header()), Some(column));
        }
        assert_eq!(Column::BodyText.header(), "Title text");
        assert_eq!(Column::from_header("person"), None);
    }

    #[test]
    fn sort_by_date_puts_missing_dates_last_both_ways() {
        let table = ResultTable::new(vec![
            row("a", "1", None),
            row("a", "2", Some("2023-01-01")),
            row("a", "3", Some("2024-01-01")),
        ]);

        let asc = table.clone().sort_by("Date", true).unwrap();
        assert_eq!(links(&asc), vec!["2", "3", "1"]);

        let desc = table.sort_by("Date", false).unwrap();
        assert_eq!(links(&desc), vec!["3", "2", "1"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let table = ResultTable::new(vec![
            row("b", "1", Some("2023-01-01")),
            row("a", "2", Some("2023-01-01")),
            row("c", "3", Some("2023-01-01")),
        ]);
        let sorted = table.sort_by("Date", true).unwrap();
        assert_eq!(links(&sorted), vec!["1", "2", "3"]);
    }

    #[test]
    fn multi_key_sort_uses_later_keys_as_tie_breakers() {
        let table = ResultTable::new(vec![
            row("b", "1", Some("2023-01-01")),
            row("a", "2", Some("2023-01-01")),
            row("a", "3", Some("2024-01-01")),
        ]);
        let sorted = table
            .sort_by_columns(&[("Person", true), ("Date", false)])
            .unwrap();
        assert_eq!(links(&sorted), vec!["3", "2", "1"]);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let table = ResultTable::new(vec![row("a", "1", None)]);
        let err = table.sort_by("Published", true).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownColumn(ref c) if c == "Published"));
    }

    #[test]
    fn body_column_exists_only_once_added() {
        let mut table = ResultTable::new(vec![row("a", "1", None)]);
        assert!(table.column("Title text").is_err());
        table.add_column(Column::BodyText);
        assert_eq!(table.column("Title text").unwrap(), Column::BodyText);
    }
}
