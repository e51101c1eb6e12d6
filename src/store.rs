use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Feed, JobPosting, Post};

/// Store operations the scraper depends on.
///
/// Inserts report a natural-key collision as `ScrapeError::DuplicateItem` and
/// any other failure as `ScrapeError::Persistence`. Every call is a single-row,
/// independently committed operation.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Up to `limit` feeds, least recently fetched first. Never-fetched feeds sort first.
    async fn select_feeds_due(&self, limit: i64) -> Result<Vec<Feed>>;

    /// Stamp `last_fetched_at` with the current time and return the updated feed.
    async fn mark_feed_fetched(&self, feed_id: Uuid) -> Result<Feed>;

    async fn insert_post(&self, post: &Post) -> Result<Post>;

    async fn insert_job_posting(&self, job: &JobPosting) -> Result<JobPosting>;
}
