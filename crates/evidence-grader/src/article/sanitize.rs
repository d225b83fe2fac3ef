use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("html tag pattern compiles"));

/// Strips markup and collapses runs of whitespace in feed-provided text.
pub fn sanitize_text(value: &str) -> String {
    let stripped = HTML_TAG.replace_all(value, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes the date formats seen in collector payloads to `YYYY-MM-DD`.
pub fn normalize_date(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }

    ["%Y-%m-%d", "%Y/%m/%d", "%Y %b %d", "%d %B %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}
