use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Canonical skill entry. Names are stored lowercased and unique; category is
/// the only field that may change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A candidate's relationship to one skill. Unique per (candidate_id, skill_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateSkillRow {
    pub candidate_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub years_experience: Option<i32>,
    pub proficiency_level: Option<String>,
    pub is_highlighted: bool,
}

/// A job's requirement for one skill. Unique per (job_id, skill_id).
/// `importance` (1-10) weights this skill in match scoring; `is_required`
/// separates hard requirements from preferred skills.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSkillRow {
    pub job_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub is_required: bool,
    pub min_years_experience: i32,
    pub importance: i32,
}

/// Accepted proficiency levels, weakest first.
pub const PROFICIENCY_LEVELS: [&str; 4] = ["beginner", "intermediate", "advanced", "expert"];

/// Request shape for replacing a candidate's skill set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSkillInput {
    pub skill: String,
    pub category: Option<String>,
    pub years_experience: Option<i32>,
    pub proficiency_level: Option<String>,
    #[serde(default)]
    pub is_highlighted: bool,
}

/// Request shape for replacing a job's skill requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSkillInput {
    pub skill: String,
    pub category: Option<String>,
    pub is_required: bool,
    #[serde(default)]
    pub min_years_experience: i32,
    pub importance: i32,
}

/// Validates a candidate skill association before any write.
pub fn validate_candidate_skill(input: &CandidateSkillInput) -> Result<(), String> {
    if input.skill.trim().is_empty() {
        return Err("skill name must not be empty".to_string());
    }
    if let Some(years) = input.years_experience {
        if years < 0 {
            return Err(format!("years_experience must be non-negative, got {years}"));
        }
    }
    if let Some(level) = input.proficiency_level.as_deref() {
        if !PROFICIENCY_LEVELS.contains(&level) {
            return Err(format!(
                "proficiency_level must be one of {PROFICIENCY_LEVELS:?}, got '{level}'"
            ));
        }
    }
    Ok(())
}

/// Validates a job skill association before any write.
pub fn validate_job_skill(input: &JobSkillInput) -> Result<(), String> {
    if input.skill.trim().is_empty() {
        return Err("skill name must not be empty".to_string());
    }
    if input.min_years_experience < 0 {
        return Err(format!(
            "min_years_experience must be non-negative, got {}",
            input.min_years_experience
        ));
    }
    if !(1..=10).contains(&input.importance) {
        return Err(format!(
            "importance must be between 1 and 10, got {}",
            input.importance
        ));
    }
    Ok(())
}
