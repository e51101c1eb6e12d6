//! Feed diagnostics: fetch a URL once and report how it parses.

use feed_rs::parser;
use std::io::Cursor;
use tracing::debug;

use super::client::FeedClient;
use super::types::{Dialect, DialectCheck, EntryInfo, ProbeReport, PROBE_ENTRY_LIMIT};
use super::util::is_valid_url;
use crate::error::{Result, ScrapeError};
use crate::TARGET_WEB_REQUEST;

/// Fetch `url` and check it against the generic parser and both dialect decoders.
///
/// Nothing is written to the store.
pub async fn probe_feed(client: &FeedClient, url: &str) -> Result<ProbeReport> {
    if !is_valid_url(url) {
        return Err(ScrapeError::FetchTransport {
            url: url.to_string(),
            message: "invalid URL format".to_string(),
        });
    }

    let body = client.fetch_bytes(url).await?;
    Ok(inspect_payload(url, &body))
}

/// Build a report for an already retrieved payload.
pub fn inspect_payload(url: &str, body: &[u8]) -> ProbeReport {
    let mut report = ProbeReport {
        url: url.to_string(),
        bytes: body.len(),
        title: None,
        entries_found: 0,
        entries: Vec::new(),
        parse_error: None,
        dialects: Vec::new(),
    };

    match parser::parse(Cursor::new(body)) {
        Ok(feed) => {
            debug!(target: TARGET_WEB_REQUEST, "Parsed feed with {} entries", feed.entries.len());
            report.title = feed.title.map(|t| t.content);
            report.entries_found = feed.entries.len();
            report.entries = feed
                .entries
                .into_iter()
                .take(PROBE_ENTRY_LIMIT)
                .map(|entry| EntryInfo {
                    title: entry.title.map(|t| t.content),
                    url: entry.links.first().map(|link| link.href.clone()),
                    pub_date: entry.published.map(|d| d.to_rfc2822()),
                })
                .collect();
        }
        Err(err) => {
            report.parse_error = Some(err.to_string());
        }
    }

    for dialect in [Dialect::Standard, Dialect::JobBoard] {
        let check = match dialect.decode(body) {
            Ok(items) => DialectCheck {
                dialect,
                items: Some(items.len()),
                error: None,
            },
            Err(err) => DialectCheck {
                dialect,
                items: None,
                error: Some(err.to_string()),
            },
        };
        report.dialects.push(check);
    }

    report
}
