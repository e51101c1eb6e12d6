//! Utility functions for RSS feed processing.

use chrono::{DateTime, Utc};
use url::Url;

/// RFC 1123 with a numeric zone, e.g. `Mon, 02 Jan 2006 15:04:05 -0700`.
pub const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Helper function to validate a URL
pub fn is_valid_url(url: &str) -> bool {
    if let Ok(parsed) = Url::parse(url) {
        parsed.scheme() == "http" || parsed.scheme() == "https"
    } else {
        false
    }
}

/// Parse a feed publish date. Anything that does not match
/// [`PUB_DATE_FORMAT`] is treated as absent.
pub fn parse_pub_date(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(date_str.trim(), PUB_DATE_FORMAT)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Shorten text for log lines and previews.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut shortened: String = text.chars().take(max_chars).collect();
        shortened.push('…');
        shortened
    }
}
