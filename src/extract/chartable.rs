use std::sync::LazyLock;

use regex::Regex;

static TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\|?\s*:?-{2,}:?\s*(\|\s*:?-{2,}:?\s*)+\|?\s*$")
        .expect("valid table separator regex")
});

static NUMERIC_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|\s*-?\$?\d[\d,]*(?:\.\d+)?\s*[%a-zA-Z°]*\s*\|").expect("valid numeric cell regex")
});

static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:\d{4}-\d{2}-\d{2}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}|(?:19|20)\d{2})\b")
        .expect("valid date token regex")
});

static BULLET_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*[-•*]\s+[^:\n]+:\s*-?\d").expect("valid bullet value regex")
});

static DOMAIN_KEYWORDS: [&str; 10] = [
    "temperature",
    "salinity",
    "measurement",
    "trend",
    "count",
    "total",
    "average",
    "data",
    "chart",
    "percent",
];

/// Cheap advisory gate: does `text` look worth running extraction on?
///
/// It may disagree with the extractor in both directions; callers use it
/// only to skip extraction for text that is clearly not numeric.
#[must_use]
pub fn has_chartable_data(text: &str) -> bool {
    if !text.chars().any(|ch| ch.is_ascii_digit()) {
        return false;
    }

    let is_table = TABLE_SEPARATOR.is_match(text);
    if is_table && NUMERIC_CELL.is_match(text) {
        return true;
    }
    if BULLET_VALUE.is_match(text) {
        return true;
    }

    let has_dates = DATE_TOKEN.is_match(text);
    let lower = text.to_lowercase();
    let has_keywords = DOMAIN_KEYWORDS.iter().any(|word| lower.contains(word));
    has_dates && has_keywords
}
