use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::job_models::Job;

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        client_id: Uuid,
        title: &str,
        description: Option<&str>,
        budget: f64,
    ) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (client_id, title, description, budget)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(client_id)
        .bind(title)
        .bind(description)
        .bind(budget)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn find_by_id(&self, job_id: Uuid) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    pub async fn find_recent(&self, limit: i64) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }
}
