//! Publish-date normalization and date-candidate parsing.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

/// Length of a `YYYY-MM-DD` prefix.
const DATE_PREFIX_LEN: usize = 10;

/// Earliest year accepted from page heuristics.
const MIN_PLAUSIBLE_YEAR: i32 = 1995;

static URL_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[/_.-])((?:19|20)\d{2})[/_.-](\d{1,2})[/_.-](\d{1,2})(?:[/_.-]|$)")
        .expect("valid url date regex")
});
static URL_COMPACT_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/((?:19|20)\d{2})(\d{2})(\d{2})(?:/|$)").expect("valid compact url date regex")
});

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%b. %d, %Y",
];

/// Reduce a raw date value to its first ten characters.
///
/// Leading whitespace is ignored. `None`, empty, and blank inputs give `None`.
/// Counts characters rather than bytes, so multi-byte input never panics.
#[must_use]
pub fn normalize_date(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(DATE_PREFIX_LEN).collect())
}

/// Parse a loosely formatted date string (ISO 8601, RFC 2822, or a few common
/// day-first and month-name layouts) and keep it only if plausible.
#[must_use]
pub fn parse_date_candidate(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| DateTime::parse_from_rfc2822(raw).map(|dt| dt.date_naive()))
        .ok()
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        })
        .or_else(|| {
            // ISO date followed by a timezone or fraction that the layouts above miss.
            let prefix: String = raw.chars().take(DATE_PREFIX_LEN).collect();
            NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
        })?;

    is_plausible(parsed).then_some(parsed)
}

/// Date encoded in a URL path, e.g. `/2023/05/01/` or `/news-2023-05-01-slug`.
#[must_use]
pub fn date_from_url(url: &str) -> Option<NaiveDate> {
    URL_DATE_RE
        .captures_iter(url)
        .chain(URL_COMPACT_DATE_RE.captures_iter(url))
        .find_map(|cap| {
            let year = cap.get(1)?.as_str().parse::<i32>().ok()?;
            let month = cap.get(2)?.as_str().parse::<u32>().ok()?;
            let day = cap.get(3)?.as_str().parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, day).filter(|d| is_plausible(*d))
        })
}

/// `YYYY-MM-DD` rendering used for every resolved date.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn is_plausible(date: NaiveDate) -> bool {
    let latest = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX);
    date.year() >= MIN_PLAUSIBLE_YEAR && date <= latest
}
