//! Regex-based HTML helpers: page text, article body, and publish date.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::dates::parse_date_candidate;
use crate::html_jsonld;

/// Paragraphs shorter than this are navigation or captions, not body text.
const MIN_PARAGRAPH_CHARS: usize = 40;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));
/// One pattern per element so each opening tag only closes on its own name.
static NON_CONTENT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["script", "style", "noscript", "template", "svg"]
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                .expect("valid non-content regex")
        })
        .collect()
});
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<article\b[^>]*>(.*?)</article>").expect("valid article regex"));
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid paragraph regex"));
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static TIME_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<time\b[^>]*>").expect("valid regex"));

/// Meta keys that carry a publish date, most specific first.
const DATE_META_KEYS: &[&str] = &[
    "article:published_time",
    "og:published_time",
    "datePublished",
    "pubdate",
    "publishdate",
    "parsely-pub-date",
    "DC.date.issued",
    "date",
];

/// Strip tags and collapse whitespace; decodes the handful of entities that
/// show up in article text.
#[must_use]
pub fn clean_text(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    decode_entities(&no_tags)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visible text of a whole page: scripts, styles and comments removed,
/// remaining markup stripped, whitespace collapsed.
#[must_use]
pub fn page_text(html: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(html, " ");
    clean_text(&strip_non_content(&without_comments))
}

/// Remove script, style, and other non-rendered elements with their contents.
fn strip_non_content(html: &str) -> String {
    NON_CONTENT_RES
        .iter()
        .fold(html.to_string(), |acc, re| re.replace_all(&acc, " ").into_owned())
}

/// Main article text: JSON-LD `articleBody`, else paragraphs inside
/// `<article>`, else every paragraph of meaningful length.
#[must_use]
pub fn extract_article_body(html: &str) -> Option<String> {
    if let Some(body) = html_jsonld::article_body(html) {
        return Some(body);
    }

    let html = strip_non_content(html);
    let from_article = ARTICLE_RE
        .captures_iter(&html)
        .filter_map(|cap| cap.get(1))
        .map(|m| joined_paragraphs(m.as_str()))
        .max_by_key(String::len)
        .filter(|text| !text.is_empty());

    from_article.or_else(|| Some(joined_paragraphs(&html)).filter(|text| !text.is_empty()))
}

/// Publish date from `<meta>` tags or JSON-LD.
#[must_use]
pub fn extract_published_date(html: &str) -> Option<NaiveDate> {
    DATE_META_KEYS
        .iter()
        .find_map(|key| {
            ["property", "name", "itemprop"]
                .iter()
                .find_map(|attr| find_meta_content(html, attr, key))
                .and_then(|raw| parse_date_candidate(&raw))
        })
        .or_else(|| html_jsonld::published_date(html))
}

/// First parsable `datetime` attribute of a `<time>` element.
#[must_use]
pub fn extract_time_element_date(html: &str) -> Option<NaiveDate> {
    TIME_TAG_RE
        .find_iter(html)
        .filter_map(|m| extract_attr(m.as_str(), "datetime"))
        .find_map(|raw| parse_date_candidate(&raw))
}

/// First `max_chars` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

fn joined_paragraphs(html: &str) -> String {
    PARAGRAPH_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| clean_text(m.as_str())))
        .filter(|p| p.chars().count() >= MIN_PARAGRAPH_CHARS)
        .collect::<Vec<_>>()
        .join(" ")
}

fn find_meta_content(html: &str, key_attr: &str, key_value: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let key = extract_attr(tag, key_attr)?;
        if key.eq_ignore_ascii_case(key_value) {
            extract_attr(tag, "content")
        } else {
            None
        }
    })
}

fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    let pattern = format!(r#"(?is)\b{}\s*=\s*["']([^"']+)["']"#, regex::escape(attr));
    let re = Regex::new(&pattern).ok()?;
    re.captures(tag)
        .and_then(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|v| !v.is_empty())
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&rsquo;", "\u{2019}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&laquo;", "\u{ab}")
        .replace("&raquo;", "\u{bb}")
        .replace("&mdash;", "\u{2014}")
        .replace("&ndash;", "\u{2013}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
