//! JSON-LD structured data: article body and publish date.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::dates::parse_date_candidate;
use crate::html::clean_text;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid json-ld script regex")
});

/// Longest `articleBody` among article-typed JSON-LD nodes.
pub(crate) fn article_body(html: &str) -> Option<String> {
    let mut best = String::new();
    for value in json_ld_blocks(html) {
        let mut candidates = Vec::new();
        collect_article_bodies(&value, &mut candidates);
        if let Some(candidate) = candidates.into_iter().max_by_key(String::len) {
            if candidate.len() > best.len() {
                best = candidate;
            }
        }
    }
    (!best.is_empty()).then_some(best)
}

/// First parsable `datePublished` (else `dateCreated`) in any JSON-LD block.
pub(crate) fn published_date(html: &str) -> Option<NaiveDate> {
    let blocks = json_ld_blocks(html);
    ["datePublished", "dateCreated"].iter().find_map(|key| {
        blocks.iter().find_map(|value| {
            let mut raw = Vec::new();
            collect_string_fields(value, key, &mut raw);
            raw.iter().find_map(|r| parse_date_candidate(r))
        })
    })
}

fn json_ld_blocks(html: &str) -> Vec<Value> {
    SCRIPT_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let raw = cap.get(1).map_or("", |m| m.as_str()).trim();
            if raw.is_empty() {
                return None;
            }
            serde_json::from_str::<Value>(raw).ok()
        })
        .collect()
}

fn collect_article_bodies(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if looks_like_article_node(map.get("@type")) {
                if let Some(body) = map
                    .get("articleBody")
                    .and_then(Value::as_str)
                    .map(clean_text)
                    .filter(|b| !b.is_empty())
                {
                    out.push(body);
                }
            }
            for child in map.values() {
                collect_article_bodies(child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_article_bodies(child, out);
            }
        }
        _ => {}
    }
}

fn collect_string_fields(value: &Value, key: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(s) = map.get(key).and_then(Value::as_str) {
                out.push(s.to_string());
            }
            for child in map.values() {
                collect_string_fields(child, key, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_string_fields(child, key, out);
            }
        }
        _ => {}
    }
}

fn contains_article_token(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.contains("article") || lower.contains("blogposting") || lower.contains("report")
}

fn looks_like_article_node(node_type: Option<&Value>) -> bool {
    match node_type {
        Some(Value::String(s)) => contains_article_token(s),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .any(contains_article_token),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_body_from_graph() {
        let html = r#"<script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[
                {"@type":"WebPage","articleBody":"not an article node"},
                {"@type":["NewsArticle"],"articleBody":"<p>Real   body</p>"}
            ]}
        </script>"#;
        assert_eq!(article_body(html).as_deref(), Some("Real body"));
    }

    #[test]
    fn malformed_json_ld_is_ignored() {
        let html = r#"<script type="application/ld+json">{ not json</script>"#;
        assert_eq!(article_body(html), None);
        assert_eq!(published_date(html), None);
    }

    #[test]
    fn published_date_prefers_date_published() {
        let html = r#"<script type="application/ld+json">
            {"@type":"Article","dateCreated":"2020-01-01","datePublished":"2023-05-01T09:00:00Z"}
        </script>"#;
        assert_eq!(published_date(html), NaiveDate::from_ymd_opt(2023, 5, 1));
    }

    #[test]
    fn published_date_falls_back_to_date_created() {
        let html = r#"<script type="application/ld+json">{"dateCreated":"2021-03-04"}</script>"#;
        assert_eq!(published_date(html), NaiveDate::from_ymd_opt(2021, 3, 4));
    }
}
