use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::models::{JobCandidateMatchRow, MatchResult};
use crate::matching::service;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ComputeMatchRequest {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
}

/// POST /api/v1/matches/compute
pub async fn handle_compute_match(
    State(state): State<AppState>,
    Json(req): Json<ComputeMatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let result =
        service::compute_match(&state.db, state.embedder.as_ref(), req.job_id, req.candidate_id)
            .await?;
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct RankCandidatesRequest {
    pub job_id: Uuid,
    pub candidate_ids: Vec<Uuid>,
}

/// POST /api/v1/matches/rank
pub async fn handle_rank_candidates(
    State(state): State<AppState>,
    Json(req): Json<RankCandidatesRequest>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    if req.candidate_ids.is_empty() {
        return Err(AppError::Validation(
            "candidate_ids must not be empty".to_string(),
        ));
    }
    let ranked = service::rank_candidates(
        &state.db,
        state.embedder.as_ref(),
        req.job_id,
        &req.candidate_ids,
    )
    .await?;
    Ok(Json(ranked))
}

/// GET /api/v1/jobs/:job_id/matches
pub async fn handle_get_matches_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobCandidateMatchRow>>, AppError> {
    let matches = service::get_matches_for_job(&state.db, job_id).await?;
    Ok(Json(matches))
}

#[derive(Deserialize)]
pub struct VerifyMatchRequest {
    pub verified_by: Uuid,
    pub notes: Option<String>,
}

/// PATCH /api/v1/matches/:id/verify — human reviewers only; the engine
/// never writes these fields.
pub async fn handle_verify_match(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
    Json(req): Json<VerifyMatchRequest>,
) -> Result<Json<JobCandidateMatchRow>, AppError> {
    let row =
        service::verify_match(&state.db, match_id, req.verified_by, req.notes.as_deref()).await?;
    Ok(Json(row))
}
