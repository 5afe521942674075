use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::bias::models::{BiasAuditRow, JobBiasAuditRow};
use crate::errors::AppError;
use crate::fairness::aggregate::compute_stats;
use crate::fairness::models::{FairnessMetricRow, MetricScope};

/// Computes and appends one fairness snapshot over all audits up to `as_of`.
/// Prior snapshots are never touched; retrying with the same inputs appends
/// an identical payload.
pub async fn snapshot(
    pool: &PgPool,
    scope: MetricScope,
    as_of: DateTime<Utc>,
) -> Result<FairnessMetricRow, AppError> {
    let candidate_audits: Vec<BiasAuditRow> = match scope {
        MetricScope::System | MetricScope::Candidate => {
            sqlx::query_as("SELECT * FROM bias_audits WHERE created_at <= $1")
                .bind(as_of)
                .fetch_all(pool)
                .await?
        }
        MetricScope::Job => Vec::new(),
    };
    let job_audits: Vec<JobBiasAuditRow> = match scope {
        MetricScope::System | MetricScope::Job => {
            sqlx::query_as("SELECT * FROM job_bias_audits WHERE created_at <= $1")
                .bind(as_of)
                .fetch_all(pool)
                .await?
        }
        MetricScope::Candidate => Vec::new(),
    };

    let previous = latest(pool, scope).await?;
    let stats = compute_stats(
        scope,
        &candidate_audits,
        &job_audits,
        previous.as_ref().map(|p| &p.metric_data),
    );
    let metric_data = serde_json::to_value(&stats).context("serializing fairness stats")?;

    let row = sqlx::query_as::<_, FairnessMetricRow>(
        r#"
        INSERT INTO fairness_metrics (id, metric_type, metric_data)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(scope.as_str())
    .bind(&metric_data)
    .fetch_one(pool)
    .await?;

    info!(
        "fairness snapshot appended: scope={} biased_fraction={:.3}",
        scope.as_str(),
        stats.biased_fraction
    );
    Ok(row)
}

/// Most recent snapshot for a scope, if any.
pub async fn latest(
    pool: &PgPool,
    scope: MetricScope,
) -> Result<Option<FairnessMetricRow>, sqlx::Error> {
    sqlx::query_as::<_, FairnessMetricRow>(
        r#"
        SELECT * FROM fairness_metrics
        WHERE metric_type = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(scope.as_str())
    .fetch_optional(pool)
    .await
}
