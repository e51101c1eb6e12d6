use tracing::{debug, instrument};
use uuid::Uuid;

use super::core::Database;
use crate::models::Post;
use crate::TARGET_DB;

impl Database {
    /// Insert a post. `(feed_id, url)` collisions surface as a unique violation.
    #[instrument(target = "db_query", level = "debug", skip(self, post), fields(url = %post.url))]
    pub async fn create_post(&self, post: &Post) -> Result<Post, sqlx::Error> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, created_at, updated_at, title, url, description, published_at, feed_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING *
            "#,
        )
        .bind(post.id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(&post.title)
        .bind(&post.url)
        .bind(&post.description)
        .bind(post.published_at)
        .bind(post.feed_id)
        .fetch_one(self.pool())
        .await?;

        debug!(target: TARGET_DB, "Stored post {}", created.url);
        Ok(created)
    }

    /// Most recent posts of a feed, newest publication first.
    #[instrument(target = "db_query", level = "debug", skip(self))]
    pub async fn posts_for_feed(&self, feed_id: Uuid, limit: i64) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE feed_id = ?1
            ORDER BY published_at DESC NULLS LAST, created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(feed_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await
    }
}
