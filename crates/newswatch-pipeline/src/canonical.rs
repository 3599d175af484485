//! Link deduplication, person-name canonicalization, and link removal.
//!
//! All three are total and idempotent.

use std::collections::HashSet;

use newswatch_core::PersonNameMap;

use crate::table::ResultTable;

/// Keep the first row for each distinct `link`, preserving input order.
#[must_use]
pub fn dedupe(table: ResultTable) -> ResultTable {
    let mut seen: HashSet<String> = HashSet::new();
    table.retain(|record| seen.insert(record.link.clone()))
}

/// Rewrite every `person` to its canonical spelling.
#[must_use]
pub fn rename_persons(mut table: ResultTable, names: &PersonNameMap) -> ResultTable {
    if names.is_empty() {
        return table;
    }
    for record in table.rows_mut() {
        let canonical = names.canonical(&record.person).to_string();
        if canonical != record.person {
            record.person = canonical;
        }
    }
    table
}

/// Drop rows whose link contains any of `patterns` as a literal substring.
#[must_use]
pub fn remove_by_links(table: ResultTable, patterns: &[String]) -> ResultTable {
    let patterns: Vec<&str> = patterns
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();
    if patterns.is_empty() {
        return table;
    }
    table.retain(|record| !patterns.iter().any(|p| record.link.contains(p)))
}

#[cfg(test)]
mod tests {
    use newswatch_core::SearchResultRecord;

    use super::*;

    fn row(person: &str, link: &str, title: &str) -> SearchResultRecord {
        SearchResultRecord::new(person, link, title, "", None)
    }

    fn sample() -> ResultTable {
        ResultTable::new(vec![
            row("Oleg Nivievskyi", "https://example.com/a", "first"),
            row("Roman Neyter", "https://example.com/b", "b"),
            row("Roman Neyter", "https://example.com/a", "second"),
            row("Oleg Nivievskyi", "https://example.com/c", "c"),
        ])
    }

    #[test]
    fn dedupe_keeps_first_occurrence_in_order() {
        let out = dedupe(sample());
        let rows = out.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].link, "https://example.com/a");
        assert_eq!(rows[0].person, "Oleg Nivievskyi");
        assert_eq!(rows[0].title, "first");
        assert_eq!(rows[1].link, "https://example.com/b");
        assert_eq!(rows[2].link, "https://example.com/c");
    }

    #[test]
    fn dedupe_is_idempotent() {
        let once = dedupe(sample());
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn rename_rewrites_mapped_names_only() {
        let names = PersonNameMap::from_pairs([("Oleg Nivievskyi", "Oleh Nivievskyi")]).unwrap();
        let out = rename_persons(sample(), &names);
        let persons: Vec<&str> = out.rows().iter().map(|r| r.person.as_str()).collect();
        assert_eq!(
            persons,
            vec!["Oleh Nivievskyi", "Roman Neyter", "Roman Neyter", "Oleh Nivievskyi"]
        );
    }

    #[test]
    fn rename_is_idempotent_with_chained_mapping() {
        let names = PersonNameMap::from_pairs([
            ("Oleg Nivievskyi", "Oleh Nivievskyi"),
            ("Oleh Nivievskyi", "Oleh Nivievskyi (KSE)"),
        ])
        .unwrap();
        let once = rename_persons(sample(), &names);
        let twice = rename_persons(once.clone(), &names);
        assert_eq!(once, twice);
        assert_eq!(once.rows()[0].person, "Oleh Nivievskyi (KSE)");
    }

    #[test]
    fn remove_by_links_drops_literal_matches() {
        let table = ResultTable::new(vec![
            row("a", "https://example.com/report.pdf", ""),
            row("a", "https://example.ru/x", ""),
            row("a", "https://example.com/keep", ""),
        ]);
        let out = remove_by_links(table, &[".pdf".to_string(), ".ru".to_string()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0].link, "https://example.com/keep");
    }

    #[test]
    fn remove_by_links_ignores_empty_patterns() {
        let out = remove_by_links(sample(), &[String::new()]);
        assert_eq!(out.len(), 4);
    }
}
