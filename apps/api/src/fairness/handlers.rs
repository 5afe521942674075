use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::fairness::models::{FairnessMetricRow, MetricScope};
use crate::fairness::service;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SnapshotRequest {
    pub scope: MetricScope,
    /// Defaults to now; external batch schedulers pass an explicit cutoff.
    pub as_of: Option<DateTime<Utc>>,
}

/// POST /api/v1/fairness/snapshot
pub async fn handle_snapshot(
    State(state): State<AppState>,
    Json(req): Json<SnapshotRequest>,
) -> Result<Json<FairnessMetricRow>, AppError> {
    let as_of = req.as_of.unwrap_or_else(Utc::now);
    let row = service::snapshot(&state.db, req.scope, as_of).await?;
    Ok(Json(row))
}

#[derive(Deserialize)]
pub struct LatestQuery {
    pub scope: MetricScope,
}

/// GET /api/v1/fairness/latest?scope=
pub async fn handle_latest(
    State(state): State<AppState>,
    Query(params): Query<LatestQuery>,
) -> Result<Json<FairnessMetricRow>, AppError> {
    service::latest(&state.db, params.scope)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!("No snapshot for scope '{}'", params.scope.as_str()))
        })
}
