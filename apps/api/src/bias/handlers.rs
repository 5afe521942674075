use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::bias::audit;
use crate::bias::models::{BiasAuditRow, JobBiasAuditRow};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CandidateAuditRequest {
    pub candidate_id: Uuid,
    pub prompt_text: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct CandidateAuditResponse {
    pub audit: BiasAuditRow,
    pub has_bias: bool,
    pub summary: Value,
}

/// POST /api/v1/audits/candidate
pub async fn handle_audit_candidate(
    State(state): State<AppState>,
    Json(req): Json<CandidateAuditRequest>,
) -> Result<Json<CandidateAuditResponse>, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("content must not be empty".to_string()));
    }
    let audit = audit::audit_candidate_output(
        &state.db,
        state.classifier.as_ref(),
        req.candidate_id,
        &req.prompt_text,
        &req.content,
    )
    .await?;
    let has_bias = audit.has_bias();
    let summary = audit.bias_summary();
    Ok(Json(CandidateAuditResponse {
        audit,
        has_bias,
        summary,
    }))
}

#[derive(Deserialize)]
pub struct JobAuditRequest {
    pub job_id: Uuid,
    pub text: String,
}

#[derive(Serialize)]
pub struct JobAuditResponse {
    pub audit: JobBiasAuditRow,
    pub has_bias: bool,
    pub bias_level: &'static str,
}

/// POST /api/v1/audits/job
pub async fn handle_audit_job(
    State(state): State<AppState>,
    Json(req): Json<JobAuditRequest>,
) -> Result<Json<JobAuditResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let audit = audit::audit_job_description(&state.db, req.job_id, &req.text).await?;
    let has_bias = audit.has_bias();
    let bias_level = audit.bias_level();
    Ok(Json(JobAuditResponse {
        audit,
        has_bias,
        bias_level,
    }))
}

/// GET /api/v1/candidates/:id/audits
pub async fn handle_candidate_audit_history(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Vec<BiasAuditRow>>, AppError> {
    let audits = audit::audits_for_candidate(&state.db, candidate_id).await?;
    Ok(Json(audits))
}

/// GET /api/v1/jobs/:id/audits
pub async fn handle_job_audit_history(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobBiasAuditRow>>, AppError> {
    let audits = audit::audits_for_job(&state.db, job_id).await?;
    Ok(Json(audits))
}
