//! Date extraction from loosely formatted text
//!
//! Book and author pages write dates in whatever shape the editor typed:
//! "July 11th 2006", "March 2, 1904", "2005", "(first published 1960)".
//! The parser here is fuzzy: it walks the tokens, keeps the ones that look
//! like date components and ignores everything else.

use crate::record::Timestamp;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static FIRST_PUBLISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)first published.*(\d{4})").unwrap());

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Date components collected while scanning tokens
#[derive(Debug, Default)]
struct DateParts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    time: Option<NaiveTime>,
}

impl DateParts {
    fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none() && self.time.is_none()
    }

    /// Records whatever date component `token` holds; first occurrence wins
    fn absorb(&mut self, token: &str) {
        if let Some(date) = parse_numeric_date(token) {
            self.year.get_or_insert(date.0);
            self.month.get_or_insert(date.1);
            self.day.get_or_insert(date.2);
        } else if let Some(month) = month_from_name(token) {
            self.month.get_or_insert(month);
        } else if let Some(time) = parse_time(token) {
            self.time.get_or_insert(time);
        } else if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(year) = token.parse() {
                self.year.get_or_insert(year);
            }
        } else if let Some(day) = parse_day(token) {
            self.day.get_or_insert(day);
        }
    }

    /// Fills missing components with the earliest representable value
    fn build(self) -> Option<Timestamp> {
        if self.is_empty() {
            return None;
        }

        let date = NaiveDate::from_ymd_opt(
            self.year.unwrap_or(1),
            self.month.unwrap_or(1),
            self.day.unwrap_or(1),
        )?;
        let time = self.time.unwrap_or(NaiveTime::MIN);

        Some(Timestamp::new(date.and_time(time)))
    }
}

/// Parses a loosely formatted date
///
/// Recognized tokens are month names (full or abbreviated), day numbers with
/// an optional ordinal suffix, four-digit years, `YYYY-MM-DD`, `MM/DD/YYYY`
/// and `HH:MM[:SS]`. Other words are skipped. Missing components default to
/// year 1, January, the 1st, midnight.
///
/// Returns `None` when no date component is found or the components do not
/// form a real date.
///
/// # Examples
///
/// ```
/// use bibliocrawl::extract::parse_flexible_date;
///
/// let ts = parse_flexible_date("Published July 11th 2006 by Grand Central").unwrap();
/// assert_eq!(ts.to_string(), "2006-07-11 00:00:00");
/// assert!(parse_flexible_date("").is_none());
/// ```
pub fn parse_flexible_date(text: &str) -> Option<Timestamp> {
    let mut parts = DateParts::default();

    for raw in text.split(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')' | ';')) {
        let token = raw.trim_matches('.');
        if !token.is_empty() {
            parts.absorb(token);
        }
    }

    parts.build()
}

/// Parses each line mentioning "published" (case-insensitive)
///
/// Lines without the word are dropped before parsing; surviving lines map
/// one-to-one onto the output, `None` where the line holds no usable date.
pub fn extract_publish_dates<S: AsRef<str>>(lines: &[S]) -> Vec<Option<Timestamp>> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| line.to_lowercase().contains("published"))
        .map(parse_flexible_date)
        .collect()
}

/// Extracts the year from text like "(first published July 11th 1960)"
///
/// The match is case-insensitive and takes the last four-digit run after
/// the "first published" marker.
pub fn extract_first_publish_year(text: &str) -> Option<i32> {
    FIRST_PUBLISHED_RE
        .captures(text.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|year| year.as_str().parse().ok())
}

fn parse_numeric_date(token: &str) -> Option<(i32, u32, u32)> {
    use chrono::Datelike;

    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
        .map(|date| (date.year(), date.month(), date.day()))
}

fn month_from_name(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    let lower = token.to_lowercase();

    MONTHS
        .iter()
        .position(|name| name.starts_with(lower.as_str()))
        .map(|index| index as u32 + 1)
}

fn parse_time(token: &str) -> Option<NaiveTime> {
    if !token.contains(':') {
        return None;
    }
    NaiveTime::parse_from_str(token, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M"))
        .ok()
}

fn parse_day(token: &str) -> Option<u32> {
    let lower = token.to_lowercase();
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .unwrap_or(&lower);

    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok().filter(|day| (1..=31).contains(day))
}
