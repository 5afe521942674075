use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A job posting as seen by the matching and audit engines. Administered by
/// the external CRUD layer; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    /// Description embedding, refreshed whenever the posting text changes.
    pub embedding: Option<Vec<f32>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    /// The text the embedding provider sees for this job.
    pub fn posting_text(&self) -> String {
        match self.requirements.as_deref() {
            Some(reqs) => format!("{}\n\n{}\n\n{}", self.title, self.description, reqs),
            None => format!("{}\n\n{}", self.title, self.description),
        }
    }
}

pub async fn fetch_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}
