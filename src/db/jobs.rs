use tracing::{debug, instrument};

use super::core::Database;
use crate::models::JobPosting;
use crate::TARGET_DB;

impl Database {
    /// Insert a job posting. A known `url` surfaces as a unique violation.
    #[instrument(target = "db_query", level = "debug", skip(self, job), fields(url = %job.url))]
    pub async fn create_job_posting(&self, job: &JobPosting) -> Result<JobPosting, sqlx::Error> {
        let created = sqlx::query_as::<_, JobPosting>(
            r#"
            INSERT INTO jobs (id, created_at, updated_at, title, company, url, image, description, tag, location, published_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(job.created_at)
        .bind(job.updated_at)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.url)
        .bind(&job.image)
        .bind(&job.description)
        .bind(&job.tag)
        .bind(&job.location)
        .bind(job.published_at)
        .fetch_one(self.pool())
        .await?;

        debug!(target: TARGET_DB, "Stored job posting {}", created.url);
        Ok(created)
    }

    #[instrument(target = "db_query", level = "debug", skip(self))]
    pub async fn job_postings(&self, limit: i64) -> Result<Vec<JobPosting>, sqlx::Error> {
        sqlx::query_as::<_, JobPosting>(
            r#"
            SELECT * FROM jobs
            ORDER BY published_at DESC NULLS LAST, created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await
    }
}
