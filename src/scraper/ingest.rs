//! Turning normalized items into stored records.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, ScrapeError};
use crate::models::{Feed, JobPosting, Post};
use crate::rss::NormalizedItem;
use crate::store::FeedStore;
use crate::TARGET_DB;

/// What happened to a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Inserted,
    /// Already stored under the same natural key; nothing changed.
    Duplicate,
}

/// Description and tag are always stored, as an empty string when the source
/// left them out.
pub fn build_post(feed: &Feed, item: &NormalizedItem, now: DateTime<Utc>) -> Post {
    Post {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        title: item.title.clone(),
        url: item.link.clone(),
        description: Some(item.description.clone()),
        published_at: item.published_at,
        feed_id: feed.id,
    }
}

pub fn build_job_posting(item: &NormalizedItem, now: DateTime<Utc>) -> JobPosting {
    JobPosting {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        title: item.title.clone(),
        company: item.company.clone(),
        url: item.link.clone(),
        image: item.image.clone(),
        description: Some(item.description.clone()),
        tag: Some(item.tag.clone()),
        location: item.location.clone(),
        published_at: item.published_at,
    }
}

fn absorb_duplicate<T>(result: Result<T>, url: &str) -> Result<IngestOutcome> {
    match result {
        Ok(_) => Ok(IngestOutcome::Inserted),
        Err(ScrapeError::DuplicateItem) => {
            debug!(target: TARGET_DB, "Already stored, skipping: {}", url);
            Ok(IngestOutcome::Duplicate)
        }
        Err(err) => Err(err),
    }
}

/// Store `item` as a post of `feed`. Only non-duplicate failures are returned.
pub async fn ingest_post(
    store: &dyn FeedStore,
    feed: &Feed,
    item: &NormalizedItem,
) -> Result<IngestOutcome> {
    let post = build_post(feed, item, Utc::now());
    absorb_duplicate(store.insert_post(&post).await, &post.url)
}

/// Store `item` as a job posting. Only non-duplicate failures are returned.
pub async fn ingest_job_posting(
    store: &dyn FeedStore,
    item: &NormalizedItem,
) -> Result<IngestOutcome> {
    let job = build_job_posting(item, Utc::now());
    absorb_duplicate(store.insert_job_posting(&job).await, &job.url)
}
