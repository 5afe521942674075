use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::repo::{skills_for_candidate, skills_for_job};
use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::matching::engine::{compose_score, cosine_similarity, score_skills};
use crate::matching::models::{JobCandidateMatchRow, MatchResult};
use crate::models::candidate::{fetch_candidate, CandidateRow};
use crate::models::job::{fetch_job, JobRow};

/// Computes, persists, and returns the match for one (job, candidate) pair.
///
/// Embedding retrieval is fail-soft: any provider error degrades the result
/// to skill-only scoring with a partial marker. Unknown ids abort before any
/// write. The upsert never touches verification columns.
pub async fn compute_match(
    pool: &PgPool,
    embedder: &dyn Embedder,
    job_id: Uuid,
    candidate_id: Uuid,
) -> Result<MatchResult, AppError> {
    let job = fetch_job(pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let candidate = fetch_candidate(pool, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let job_skills = skills_for_job(pool, job_id).await?;
    let candidate_skills = skills_for_candidate(pool, candidate_id).await?;

    let (similarity, partial_reason) = match pair_similarity(embedder, &job, &candidate).await {
        Ok(sim) => (Some(sim), None),
        Err(reason) => {
            warn!("match {job_id}/{candidate_id} degraded to skill-only: {reason}");
            (None, Some(reason))
        }
    };

    let skill_score = score_skills(&job_skills, &candidate_skills);
    let (score, details, matching, missing) = compose_score(skill_score, similarity, partial_reason);

    let details_json =
        serde_json::to_value(&details).context("serializing match details")?;
    let matching_vec: Vec<String> = matching.iter().cloned().collect();
    let missing_vec: Vec<String> = missing.iter().cloned().collect();

    sqlx::query(
        r#"
        INSERT INTO job_candidate_matches
            (id, job_id, candidate_id, match_score, match_details,
             matching_skills, missing_skills)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (job_id, candidate_id) DO UPDATE SET
            match_score     = EXCLUDED.match_score,
            match_details   = EXCLUDED.match_details,
            matching_skills = EXCLUDED.matching_skills,
            missing_skills  = EXCLUDED.missing_skills,
            updated_at      = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(candidate_id)
    .bind(score)
    .bind(&details_json)
    .bind(&matching_vec)
    .bind(&missing_vec)
    .execute(pool)
    .await?;

    info!(
        "match computed: job={job_id} candidate={candidate_id} score={score:.1} partial={}",
        details.partial
    );

    Ok(MatchResult {
        job_id,
        candidate_id,
        score,
        details,
        matching_skills: matching,
        missing_skills: missing,
    })
}

/// Scores each candidate against the job and returns the results ordered by
/// score descending, candidate_id ascending. Duplicate ids are collapsed so
/// a retried batch writes each pair once.
pub async fn rank_candidates(
    pool: &PgPool,
    embedder: &dyn Embedder,
    job_id: Uuid,
    candidate_ids: &[Uuid],
) -> Result<Vec<MatchResult>, AppError> {
    let mut seen = std::collections::BTreeSet::new();
    let mut results = Vec::new();
    for &candidate_id in candidate_ids {
        if !seen.insert(candidate_id) {
            continue;
        }
        results.push(compute_match(pool, embedder, job_id, candidate_id).await?);
    }

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
    Ok(results)
}

/// All persisted matches for a job, best first.
pub async fn get_matches_for_job(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<JobCandidateMatchRow>, sqlx::Error> {
    sqlx::query_as::<_, JobCandidateMatchRow>(
        r#"
        SELECT * FROM job_candidate_matches
        WHERE job_id = $1
        ORDER BY match_score DESC, candidate_id ASC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

/// Human-review path: records a reviewer's verdict on a persisted match.
/// This is the only code that writes the verification columns.
pub async fn verify_match(
    pool: &PgPool,
    match_id: Uuid,
    verified_by: Uuid,
    notes: Option<&str>,
) -> Result<JobCandidateMatchRow, AppError> {
    sqlx::query_as::<_, JobCandidateMatchRow>(
        r#"
        UPDATE job_candidate_matches
        SET is_verified = TRUE,
            verified_by = $2,
            verification_notes = $3,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(match_id)
    .bind(verified_by)
    .bind(notes)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Match {match_id} not found")))
}

/// Raw cosine similarity for the pair, using stored embeddings when present
/// and the provider otherwise. Any failure becomes a degradation reason.
async fn pair_similarity(
    embedder: &dyn Embedder,
    job: &JobRow,
    candidate: &CandidateRow,
) -> Result<f64, String> {
    let job_vec = match &job.embedding {
        Some(v) => v.clone(),
        None => embedder
            .embed(&job.posting_text())
            .await
            .map_err(|e| format!("job embedding unavailable: {e}"))?,
    };
    let cand_vec = match &candidate.embedding {
        Some(v) => v.clone(),
        None => embedder
            .embed(&candidate.profile_text())
            .await
            .map_err(|e| format!("candidate embedding unavailable: {e}"))?,
    };
    Ok(cosine_similarity(&job_vec, &cand_vec))
}
