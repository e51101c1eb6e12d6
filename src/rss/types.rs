//! Type definitions for the RSS module.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Duration;

/// The two feed schemas the scraper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dialect {
    /// `rss/channel/item` with title, link, description and pubDate.
    Standard,
    /// Job-board channel items that also carry company, image, tag and location.
    JobBoard,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Standard => "standard",
            Dialect::JobBoard => "job-board",
        }
    }
}

/// Dialect-agnostic representation of one feed entry.
///
/// Fields absent from the source are empty strings. The job-board fields stay
/// empty for the standard dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Present only when the raw pubDate parsed as RFC 1123 with numeric zone.
    pub published_at: Option<DateTime<Utc>>,
    pub company: String,
    pub image: String,
    pub tag: String,
    pub location: String,
}

/// Basic information about a feed entry, as reported by the probe.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub title: Option<String>,
    pub url: Option<String>,
    pub pub_date: Option<String>,
}

/// Outcome of running one dialect decoder against a probed payload.
#[derive(Debug, Clone, Serialize)]
pub struct DialectCheck {
    pub dialect: Dialect,
    pub items: Option<usize>,
    pub error: Option<String>,
}

/// Diagnostic report for a single feed URL.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub url: String,
    pub bytes: usize,
    pub title: Option<String>,
    pub entries_found: usize,
    pub entries: Vec<EntryInfo>,
    pub parse_error: Option<String>,
    pub dialects: Vec<DialectCheck>,
}

// Constants
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_AGENT: &str = concat!("webrss/", env!("CARGO_PKG_VERSION"));
pub const PROBE_ENTRY_LIMIT: usize = 10;
