use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Per-skill outcome inside a match explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub is_required: bool,
    pub min_years_experience: i32,
    pub importance: i32,
    /// Years the candidate holds for this skill, if associated at all.
    pub candidate_years: Option<i32>,
    pub met: bool,
}

/// Structured breakdown explaining how a match score was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetails {
    pub semantic_component: f64,
    pub skill_component: f64,
    pub semantic_weight: f64,
    pub skill_weight: f64,
    /// True when the semantic component was unavailable and the score
    /// degraded to skill-only.
    pub partial: bool,
    pub partial_reason: Option<String>,
    pub skills: Vec<SkillAssessment>,
}

/// Result of one match computation, returned to callers and persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    /// 0-100.
    pub score: f64,
    pub details: MatchDetails,
    pub matching_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
}

/// Persisted match row, unique per (job_id, candidate_id). Verification
/// columns are written only by the human-review path, never by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobCandidateMatchRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub match_score: f64,
    pub match_details: Value,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub is_verified: bool,
    pub verified_by: Option<Uuid>,
    pub verification_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
