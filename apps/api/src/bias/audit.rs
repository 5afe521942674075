//! Audit orchestration: runs detection, applies mitigation, and persists
//! append-only audit rows. These functions service the resume-parsing and
//! job-posting workflows, so detection failures degrade instead of
//! propagating; only unknown ids and database errors are hard failures.

use anyhow::Context;
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::bias::classifier::BiasClassifier;
use crate::bias::detection::{
    build_recommendations, debias_text, detect_biased_language, detect_biased_requirements,
    detect_protected_attributes, job_bias_score, MITIGATION_THRESHOLD,
};
use crate::bias::models::{BiasAuditRow, BiasFinding, JobBiasAuditRow};
use crate::errors::AppError;
use crate::models::candidate::fetch_candidate;
use crate::models::job::fetch_job;

/// Audits one candidate-processing event: the generated content and the
/// prompt that produced it. Returns the persisted, append-only audit row.
pub async fn audit_candidate_output(
    pool: &PgPool,
    classifier: &dyn BiasClassifier,
    candidate_id: Uuid,
    prompt_text: &str,
    generated_content: &str,
) -> Result<BiasAuditRow, AppError> {
    fetch_candidate(pool, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let mut findings = detect_protected_attributes(generated_content);
    findings.extend(detect_biased_language(generated_content));

    // The classifier only ever adds findings; its failure is recorded, not
    // raised, so parsing workflows are never blocked by a provider outage.
    let degraded = match classifier.classify(generated_content).await {
        Ok(extra) => {
            for finding in extra {
                if !findings.contains(&finding) {
                    findings.push(finding);
                }
            }
            None
        }
        Err(e) => {
            warn!("bias classification degraded for candidate {candidate_id}: {e}");
            Some(e.to_string())
        }
    };

    let prompt_bias: Vec<BiasFinding> = {
        let mut pb = detect_protected_attributes(prompt_text);
        pb.extend(detect_biased_language(prompt_text));
        pb
    };

    let mitigation_actions = mitigation_actions_for(&findings);
    let mitigation_applied = !mitigation_actions.is_empty();

    let findings_json = serde_json::to_value(&findings).context("serializing findings")?;
    let prompt_bias_json = serde_json::to_value(&prompt_bias).context("serializing prompt bias")?;

    let row = sqlx::query_as::<_, BiasAuditRow>(
        r#"
        INSERT INTO bias_audits
            (id, candidate_id, findings, prompt_bias, prompt_used,
             mitigation_applied, mitigation_actions, degraded)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(candidate_id)
    .bind(&findings_json)
    .bind(&prompt_bias_json)
    .bind(prompt_text)
    .bind(mitigation_applied)
    .bind(json!(mitigation_actions))
    .bind(degraded.as_deref())
    .fetch_one(pool)
    .await?;

    info!(
        "candidate audit recorded: candidate={candidate_id} findings={} prompt_findings={} mitigated={mitigation_applied}",
        findings.len(),
        prompt_bias.len()
    );
    Ok(row)
}

/// Audits a job description, scoring it continuously and producing a
/// debiased rewrite when the score crosses the mitigation threshold.
pub async fn audit_job_description(
    pool: &PgPool,
    job_id: Uuid,
    text: &str,
) -> Result<JobBiasAuditRow, AppError> {
    fetch_job(pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let bias_terms = detect_biased_language(text);
    let biased_requirements = detect_biased_requirements(text);
    let score = job_bias_score(bias_terms.len(), biased_requirements.len());
    let recommendations = build_recommendations(&bias_terms, &biased_requirements, score);

    let (debiased_text, changes) = if score >= MITIGATION_THRESHOLD {
        let (rewritten, changes) = debias_text(text);
        (Some(rewritten), changes)
    } else {
        (None, Vec::new())
    };

    let row = sqlx::query_as::<_, JobBiasAuditRow>(
        r#"
        INSERT INTO job_bias_audits
            (id, job_id, bias_terms, biased_requirements, bias_score,
             recommendations, debiased_text, changes_made)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(serde_json::to_value(&bias_terms).context("serializing bias terms")?)
    .bind(json!(biased_requirements))
    .bind(score)
    .bind(json!(recommendations))
    .bind(debiased_text.as_deref())
    .bind(serde_json::to_value(&changes).context("serializing changes")?)
    .fetch_one(pool)
    .await?;

    info!(
        "job audit recorded: job={job_id} score={score:.2} level={} mitigated={}",
        row.bias_level(),
        row.debiased_text.is_some()
    );
    Ok(row)
}

/// Audit history for one candidate, newest first.
pub async fn audits_for_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<BiasAuditRow>, sqlx::Error> {
    sqlx::query_as::<_, BiasAuditRow>(
        "SELECT * FROM bias_audits WHERE candidate_id = $1 ORDER BY created_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

/// Audit history for one job, newest first.
pub async fn audits_for_job(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<JobBiasAuditRow>, sqlx::Error> {
    sqlx::query_as::<_, JobBiasAuditRow>(
        "SELECT * FROM job_bias_audits WHERE job_id = $1 ORDER BY created_at DESC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

/// Remediation descriptions for content findings. Biased terms are
/// rewritable; protected-attribute references are flagged for redaction by
/// the downstream review step.
fn mitigation_actions_for(findings: &[BiasFinding]) -> Vec<String> {
    findings
        .iter()
        .map(|finding| match finding {
            BiasFinding::BiasedLanguage { term, .. } => {
                format!("replaced biased term '{term}' with neutral wording")
            }
            BiasFinding::ProtectedAttribute { attribute, .. } => {
                format!("flagged {attribute} reference for redaction")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mitigation_actions_cover_both_finding_kinds() {
        let findings = vec![
            BiasFinding::BiasedLanguage {
                term: "rockstar".to_string(),
                context: "rockstar dev".to_string(),
            },
            BiasFinding::ProtectedAttribute {
                attribute: "age".to_string(),
                context: "young".to_string(),
            },
        ];
        let actions = mitigation_actions_for(&findings);
        assert_eq!(actions.len(), 2);
        assert!(actions[0].contains("rockstar"));
        assert!(actions[1].contains("age"));
    }

    #[test]
    fn test_no_findings_means_no_mitigation() {
        assert!(mitigation_actions_for(&[]).is_empty());
    }
}
