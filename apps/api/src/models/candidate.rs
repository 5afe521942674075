use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A candidate as the matching and audit engines see one. Creation and
/// administration of these rows belongs to the CRUD layer, which is outside
/// this core; here they are read by id only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub resume_text: Option<String>,
    /// Structured extraction output, persisted by the parsing workflow.
    pub parsed_data: Option<Value>,
    /// Profile embedding, refreshed whenever the profile text changes.
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateRow {
    /// The text the embedding provider sees for this candidate.
    pub fn profile_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(title) = self.title.as_deref() {
            parts.push(title);
        }
        if let Some(summary) = self.summary.as_deref() {
            parts.push(summary);
        }
        if let Some(resume) = self.resume_text.as_deref() {
            parts.push(resume);
        }
        parts.join("\n\n")
    }
}

pub async fn fetch_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await
}
