use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::registry::models::BiasPromptTemplateRow;
use crate::registry::repo;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub template_text: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
}

/// POST /api/v1/prompt-templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<Json<BiasPromptTemplateRow>, AppError> {
    let row = repo::create_template(
        &state.db,
        &req.name,
        &req.template_text,
        req.description.as_deref(),
        req.created_by,
    )
    .await?;
    Ok(Json(row))
}

#[derive(Deserialize)]
pub struct ActivateTemplateRequest {
    pub version: i32,
    pub approved_by: Option<Uuid>,
}

/// POST /api/v1/prompt-templates/:name/activate
pub async fn handle_activate_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<ActivateTemplateRequest>,
) -> Result<Json<BiasPromptTemplateRow>, AppError> {
    let row = repo::activate(&state.db, &name, req.version, req.approved_by).await?;
    Ok(Json(row))
}

/// GET /api/v1/prompt-templates/:name/active
pub async fn handle_get_active_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BiasPromptTemplateRow>, AppError> {
    repo::get_active_template(&state.db, &name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No active template named '{name}'")))
}

/// GET /api/v1/prompt-templates/:name/history
pub async fn handle_template_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<BiasPromptTemplateRow>>, AppError> {
    let rows = repo::template_history(&state.db, &name).await?;
    Ok(Json(rows))
}
