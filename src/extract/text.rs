//! Plain-text extractors: trimming, numbers and tag stripping

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Entities the HTML serializer writes back out for text content
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Trims a fragment, treating an empty result as absent
pub fn clean_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parses a non-negative count such as `"1843210"` or `"1,843,210"`
///
/// Counts above `i64::MAX` are rejected so every count fits a SQLite integer.
pub fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits
        .parse::<u64>()
        .ok()
        .filter(|count| i64::try_from(*count).is_ok())
}

/// Parses an average rating, rejecting anything outside 0.0 to 5.0
pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|rating| (0.0..=5.0).contains(rating))
}

/// Reads the page count from text like `"281 pages"`
pub fn extract_num_pages(text: &str) -> Option<u32> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .filter(|pages| *pages > 0)
}

/// Turns an HTML block into plain text lines
///
/// Tags are removed, text lines are trimmed, blank lines dropped, and the
/// first remaining line is discarded: on author pages it is always the
/// fixed "edit data" header that precedes the biography.
pub fn strip_tags_and_boilerplate(html: &str) -> String {
    let text = decode_entities(&TAG_RE.replace_all(html, ""));

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}
