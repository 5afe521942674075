use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::catalog::models::{
    validate_candidate_skill, validate_job_skill, CandidateSkillInput, CandidateSkillRow,
    JobSkillInput, JobSkillRow,
};
use crate::catalog::repo;
use crate::errors::AppError;
use crate::models::{candidate::fetch_candidate, job::fetch_job};
use crate::state::AppState;

/// PUT /api/v1/candidates/:id/skills
pub async fn handle_set_candidate_skills(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(inputs): Json<Vec<CandidateSkillInput>>,
) -> Result<Json<Vec<CandidateSkillRow>>, AppError> {
    for input in &inputs {
        validate_candidate_skill(input).map_err(AppError::Validation)?;
    }
    fetch_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let rows = repo::set_candidate_skills(&state.db, candidate_id, &inputs).await?;
    Ok(Json(rows))
}

/// PUT /api/v1/jobs/:id/skills
pub async fn handle_set_job_skills(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(inputs): Json<Vec<JobSkillInput>>,
) -> Result<Json<Vec<JobSkillRow>>, AppError> {
    for input in &inputs {
        validate_job_skill(input).map_err(AppError::Validation)?;
    }
    fetch_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let rows = repo::set_job_skills(&state.db, job_id, &inputs).await?;
    Ok(Json(rows))
}
