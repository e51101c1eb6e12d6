//! Per-feed unit of work.

use tracing::{debug, error, info};

use super::ingest::{ingest_job_posting, ingest_post, IngestOutcome};
use crate::error::Result;
use crate::models::Feed;
use crate::rss::{Dialect, FeedClient, NormalizedItem};
use crate::store::FeedStore;
use crate::TARGET_SCRAPER;

/// A source to scrape, tagged with how its items are decoded and stored.
#[derive(Debug, Clone)]
pub enum ScrapeTarget {
    /// A subscribed standard-dialect feed; items become posts.
    Feed(Feed),
    /// The fixed job-board URL; items become job postings.
    JobBoard { url: String },
}

impl ScrapeTarget {
    pub fn url(&self) -> &str {
        match self {
            ScrapeTarget::Feed(feed) => &feed.url,
            ScrapeTarget::JobBoard { url } => url,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ScrapeTarget::Feed(feed) => &feed.name,
            ScrapeTarget::JobBoard { .. } => "job board",
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            ScrapeTarget::Feed(_) => Dialect::Standard,
            ScrapeTarget::JobBoard { .. } => Dialect::JobBoard,
        }
    }

    async fn ingest(&self, store: &dyn FeedStore, item: &NormalizedItem) -> Result<IngestOutcome> {
        match self {
            ScrapeTarget::Feed(feed) => ingest_post(store, feed, item).await,
            ScrapeTarget::JobBoard { .. } => ingest_job_posting(store, item).await,
        }
    }
}

/// Scrape one target to completion.
///
/// Never fails: every error is logged here and the target is simply picked up
/// again on a later tick.
pub async fn scrape_target(store: &dyn FeedStore, client: &FeedClient, target: &ScrapeTarget) {
    if let ScrapeTarget::Feed(feed) = target {
        if let Err(err) = store.mark_feed_fetched(feed.id).await {
            error!(target: TARGET_SCRAPER, "Couldn't mark feed {} fetched: {}", feed.name, err);
            return;
        }
    }

    let items = match client.fetch(target.url(), target.dialect()).await {
        Ok(items) => items,
        Err(err) => {
            error!(target: TARGET_SCRAPER, "Couldn't collect feed {} ({}): {}", target.name(), target.url(), err);
            return;
        }
    };

    let mut inserted = 0;
    let mut duplicates = 0;
    let mut failed = 0;

    for item in &items {
        match target.ingest(store, item).await {
            Ok(IngestOutcome::Inserted) => inserted += 1,
            Ok(IngestOutcome::Duplicate) => duplicates += 1,
            Err(err) => {
                failed += 1;
                error!(target: TARGET_SCRAPER, "Couldn't store item '{}' from {}: {}", item.title, target.name(), err);
            }
        }
    }

    info!(
        target: TARGET_SCRAPER,
        "Feed {} collected, {} items found ({} new, {} already stored, {} failed)",
        target.name(),
        items.len(),
        inserted,
        duplicates,
        failed
    );
    debug!(target: TARGET_SCRAPER, "Finished {} ({})", target.name(), target.url());
}
