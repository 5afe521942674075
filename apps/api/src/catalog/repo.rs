#![allow(dead_code)]

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::catalog::models::{
    CandidateSkillInput, CandidateSkillRow, JobSkillInput, JobSkillRow, SkillRow,
};

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().and_then(|d| d.code()),
        Some(code) if code == UNIQUE_VIOLATION
    )
}

/// Returns the skill with the given name, creating it on first reference.
/// Concurrent creates race on the unique name index; the loser of the race
/// re-selects the winner's row instead of failing.
pub async fn get_or_create_skill(
    pool: &PgPool,
    name: &str,
    category: Option<&str>,
) -> Result<SkillRow, sqlx::Error> {
    let name = name.trim().to_lowercase();

    if let Some(existing) = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE name = $1")
        .bind(&name)
        .fetch_optional(pool)
        .await?
    {
        return Ok(existing);
    }

    let inserted = sqlx::query_as::<_, SkillRow>(
        "INSERT INTO skills (id, name, category) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(category)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => {
            info!("created skill '{}' ({})", row.name, row.id);
            Ok(row)
        }
        Err(e) if is_unique_violation(&e) => {
            sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE name = $1")
                .bind(&name)
                .fetch_one(pool)
                .await
        }
        Err(e) => Err(e),
    }
}

/// Category correction is the only mutation a skill row accepts.
pub async fn correct_skill_category(
    pool: &PgPool,
    skill_id: Uuid,
    category: Option<&str>,
) -> Result<Option<SkillRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillRow>(
        "UPDATE skills SET category = $2 WHERE id = $1 RETURNING *",
    )
    .bind(skill_id)
    .bind(category)
    .fetch_optional(pool)
    .await
}

/// Replaces a candidate's skill associations in one transaction.
/// Inputs must already be validated; skills are get-or-created by name.
pub async fn set_candidate_skills(
    pool: &PgPool,
    candidate_id: Uuid,
    inputs: &[CandidateSkillInput],
) -> Result<Vec<CandidateSkillRow>, sqlx::Error> {
    let mut skill_ids = Vec::with_capacity(inputs.len());
    for input in inputs {
        let skill = get_or_create_skill(pool, &input.skill, input.category.as_deref()).await?;
        skill_ids.push(skill.id);
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM candidate_skills WHERE candidate_id = $1")
        .bind(candidate_id)
        .execute(&mut *tx)
        .await?;
    for (input, skill_id) in inputs.iter().zip(&skill_ids) {
        sqlx::query(
            r#"
            INSERT INTO candidate_skills
                (candidate_id, skill_id, years_experience, proficiency_level, is_highlighted)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (candidate_id, skill_id) DO UPDATE SET
                years_experience = EXCLUDED.years_experience,
                proficiency_level = EXCLUDED.proficiency_level,
                is_highlighted = EXCLUDED.is_highlighted
            "#,
        )
        .bind(candidate_id)
        .bind(skill_id)
        .bind(input.years_experience)
        .bind(input.proficiency_level.as_deref())
        .bind(input.is_highlighted)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    skills_for_candidate(pool, candidate_id).await
}

/// Replaces a job's skill requirements in one transaction.
pub async fn set_job_skills(
    pool: &PgPool,
    job_id: Uuid,
    inputs: &[JobSkillInput],
) -> Result<Vec<JobSkillRow>, sqlx::Error> {
    let mut skill_ids = Vec::with_capacity(inputs.len());
    for input in inputs {
        let skill = get_or_create_skill(pool, &input.skill, input.category.as_deref()).await?;
        skill_ids.push(skill.id);
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM job_skills WHERE job_id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;
    for (input, skill_id) in inputs.iter().zip(&skill_ids) {
        sqlx::query(
            r#"
            INSERT INTO job_skills
                (job_id, skill_id, is_required, min_years_experience, importance)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (job_id, skill_id) DO UPDATE SET
                is_required = EXCLUDED.is_required,
                min_years_experience = EXCLUDED.min_years_experience,
                importance = EXCLUDED.importance
            "#,
        )
        .bind(job_id)
        .bind(skill_id)
        .bind(input.is_required)
        .bind(input.min_years_experience)
        .bind(input.importance)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    skills_for_job(pool, job_id).await
}

pub async fn skills_for_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<CandidateSkillRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateSkillRow>(
        r#"
        SELECT cs.candidate_id, cs.skill_id, s.name AS skill_name,
               cs.years_experience, cs.proficiency_level, cs.is_highlighted
        FROM candidate_skills cs
        JOIN skills s ON s.id = cs.skill_id
        WHERE cs.candidate_id = $1
        ORDER BY cs.skill_id
        "#,
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

/// Job skills ordered by skill_id so downstream match details are
/// reproducible for identical inputs.
pub async fn skills_for_job(pool: &PgPool, job_id: Uuid) -> Result<Vec<JobSkillRow>, sqlx::Error> {
    sqlx::query_as::<_, JobSkillRow>(
        r#"
        SELECT js.job_id, js.skill_id, s.name AS skill_name,
               js.is_required, js.min_years_experience, js.importance
        FROM job_skills js
        JOIN skills s ON s.id = js.skill_id
        WHERE js.job_id = $1
        ORDER BY js.skill_id
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

/// Cascade for candidate deletion, invoked by the external CRUD layer.
pub async fn delete_skills_for_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM candidate_skills WHERE candidate_id = $1")
        .bind(candidate_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Cascade for job deletion, invoked by the external CRUD layer.
pub async fn delete_skills_for_job(pool: &PgPool, job_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM job_skills WHERE job_id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
