mod core;
mod feeds;
mod jobs;
mod posts;
mod schema;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

pub use self::core::Database;

use crate::error::Result;
use crate::models::{Feed, JobPosting, Post};
use crate::store::FeedStore;

#[async_trait]
impl FeedStore for Database {
    async fn select_feeds_due(&self, limit: i64) -> Result<Vec<Feed>> {
        Ok(self.next_feeds_to_fetch(limit).await?)
    }

    async fn mark_feed_fetched(&self, feed_id: Uuid) -> Result<Feed> {
        Ok(self.set_feed_fetched_at(feed_id, Utc::now()).await?)
    }

    async fn insert_post(&self, post: &Post) -> Result<Post> {
        Ok(self.create_post(post).await?)
    }

    async fn insert_job_posting(&self, job: &JobPosting) -> Result<JobPosting> {
        Ok(self.create_job_posting(job).await?)
    }
}
