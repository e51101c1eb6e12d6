//! Records persisted by the store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A subscribed source. `last_fetched_at` stays `None` until the first scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Feed {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub url: String,
    pub user_id: Uuid,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

/// Content item ingested from a standard-dialect feed. Unique per `(feed_id, url)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub feed_id: Uuid,
}

/// Job item ingested from the job-board feed. Unique per `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub company: String,
    pub url: String,
    pub image: String,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub location: String,
    pub published_at: Option<DateTime<Utc>>,
}
