use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::core::Database;
use crate::models::Feed;
use crate::TARGET_DB;

impl Database {
    /// Register a new feed. A URL that is already registered is a unique violation.
    #[instrument(target = "db_query", level = "info", skip(self))]
    pub async fn create_feed(
        &self,
        name: &str,
        url: &str,
        user_id: Uuid,
    ) -> Result<Feed, sqlx::Error> {
        let now = Utc::now();

        let feed = sqlx::query_as::<_, Feed>(
            r#"
            INSERT INTO feeds (id, created_at, updated_at, name, url, user_id, last_fetched_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(now)
        .bind(name)
        .bind(url)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;

        info!(target: TARGET_DB, "Created feed {} ({})", feed.name, feed.url);
        Ok(feed)
    }

    #[instrument(target = "db_query", level = "debug", skip(self))]
    pub async fn find_feed(&self, feed_id: Uuid) -> Result<Option<Feed>, sqlx::Error> {
        sqlx::query_as::<_, Feed>("SELECT * FROM feeds WHERE id = ?1")
            .bind(feed_id)
            .fetch_optional(self.pool())
            .await
    }

    /// Feeds ordered least recently fetched first, never-fetched feeds leading.
    #[instrument(target = "db_query", level = "debug", skip(self))]
    pub async fn next_feeds_to_fetch(&self, limit: i64) -> Result<Vec<Feed>, sqlx::Error> {
        let feeds = sqlx::query_as::<_, Feed>(
            r#"
            SELECT * FROM feeds
            ORDER BY last_fetched_at ASC NULLS FIRST, created_at ASC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        debug!(target: TARGET_DB, "Selected {} feeds to fetch (limit {})", feeds.len(), limit);
        Ok(feeds)
    }

    /// Set `last_fetched_at` (and `updated_at`) to `fetched_at`.
    #[instrument(target = "db_query", level = "debug", skip(self))]
    pub async fn set_feed_fetched_at(
        &self,
        feed_id: Uuid,
        fetched_at: DateTime<Utc>,
    ) -> Result<Feed, sqlx::Error> {
        sqlx::query_as::<_, Feed>(
            r#"
            UPDATE feeds
            SET last_fetched_at = ?1, updated_at = ?1
            WHERE id = ?2
            RETURNING *
            "#,
        )
        .bind(fetched_at)
        .bind(feed_id)
        .fetch_one(self.pool())
        .await
    }
}
