use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::bias::detection::{detect_biased_language, detect_protected_attributes, job_bias_score};
use crate::errors::AppError;
use crate::registry::models::{pick_active, BiasPromptTemplateRow};

/// Inserts the next version of a named template. The template is
/// bias-evaluated at creation and starts inactive; activation is a separate
/// approval step.
pub async fn create_template(
    pool: &PgPool,
    name: &str,
    template_text: &str,
    description: Option<&str>,
    created_by: Option<Uuid>,
) -> Result<BiasPromptTemplateRow, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("template name must not be empty".to_string()));
    }
    if template_text.trim().is_empty() {
        return Err(AppError::Validation("template_text must not be empty".to_string()));
    }

    let mut findings = detect_protected_attributes(template_text);
    findings.extend(detect_biased_language(template_text));
    let bias_score = job_bias_score(findings.len(), 0);
    let findings_json = serde_json::to_value(&findings).context("serializing prompt findings")?;

    let next_version: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(version), 0) + 1 FROM bias_prompt_templates WHERE name = $1",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    let inserted = sqlx::query_as::<_, BiasPromptTemplateRow>(
        r#"
        INSERT INTO bias_prompt_templates
            (id, name, version, template_text, description,
             bias_evaluated, bias_score, bias_findings, is_active, created_by)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, FALSE, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(next_version)
    .bind(template_text)
    .bind(description)
    .bind(bias_score)
    .bind(&findings_json)
    .bind(created_by)
    .fetch_one(pool)
    .await
    .map_err(|e| match e.as_database_error().and_then(|d| d.code()) {
        Some(code) if code == "23505" => AppError::Conflict(format!(
            "template {name} v{next_version} already exists; retry to get the next version"
        )),
        _ => AppError::Database(e),
    })?;

    info!(
        "template created: {name} v{next_version} bias_score={bias_score:.2} findings={}",
        findings.len()
    );
    Ok(inserted)
}

/// Activates one version of a named template, deactivating any prior active
/// version in the same transaction. Both writes commit or neither does, so
/// the single-active-version invariant holds even under concurrent calls.
pub async fn activate(
    pool: &PgPool,
    name: &str,
    version: i32,
    approved_by: Option<Uuid>,
) -> Result<BiasPromptTemplateRow, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE bias_prompt_templates SET is_active = FALSE WHERE name = $1 AND is_active")
        .bind(name)
        .execute(&mut *tx)
        .await?;

    let activated = sqlx::query_as::<_, BiasPromptTemplateRow>(
        r#"
        UPDATE bias_prompt_templates
        SET is_active = TRUE, approved_by = $3
        WHERE name = $1 AND version = $2
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(version)
    .bind(approved_by)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = activated else {
        tx.rollback().await?;
        return Err(AppError::NotFound(format!("Template {name} v{version} not found")));
    };

    tx.commit().await?;
    info!("template activated: {name} v{version}");
    Ok(row)
}

/// Returns the active template for a name, or None. If a data-integrity
/// lapse left several rows active, the highest version (then most recent)
/// wins and the inconsistency is logged.
pub async fn get_active_template(
    pool: &PgPool,
    name: &str,
) -> Result<Option<BiasPromptTemplateRow>, sqlx::Error> {
    let active = sqlx::query_as::<_, BiasPromptTemplateRow>(
        "SELECT * FROM bias_prompt_templates WHERE name = $1 AND is_active",
    )
    .bind(name)
    .fetch_all(pool)
    .await?;

    if active.len() > 1 {
        warn!(
            "consistency warning: {} active versions for template '{name}', using highest",
            active.len()
        );
    }
    Ok(pick_active(active))
}

/// Full version history for a name, newest version first.
pub async fn template_history(
    pool: &PgPool,
    name: &str,
) -> Result<Vec<BiasPromptTemplateRow>, sqlx::Error> {
    sqlx::query_as::<_, BiasPromptTemplateRow>(
        "SELECT * FROM bias_prompt_templates WHERE name = $1 ORDER BY version DESC",
    )
    .bind(name)
    .fetch_all(pool)
    .await
}
