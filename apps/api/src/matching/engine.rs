//! Pure match scoring. No I/O here: the service layer fetches rows and
//! embeddings and feeds them in, so every function below is deterministic
//! and unit-testable.
//!
//! score = 0.6 x semantic_component + 0.4 x skill_component, both on [0,100].
//! When no similarity is available the score degrades to the skill component
//! alone and the result is flagged partial.

use std::collections::{BTreeSet, HashMap};

use crate::catalog::models::{CandidateSkillRow, JobSkillRow};
use crate::matching::models::{MatchDetails, SkillAssessment};

pub const SEMANTIC_WEIGHT: f64 = 0.6;
pub const SKILL_WEIGHT: f64 = 0.4;

/// Cosine similarity of two vectors. Zero-norm or mismatched inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rescales a raw cosine similarity to [0,100]. Embedding spaces in use are
/// effectively non-negative; a negative similarity clamps to 0 rather than
/// being mapped affinely.
pub fn semantic_component(similarity: f64) -> f64 {
    similarity.clamp(0.0, 1.0) * 100.0
}

/// Outcome of the skill-overlap evaluation.
#[derive(Debug, Clone)]
pub struct SkillScore {
    /// 0-100. Importance met over importance total.
    pub component: f64,
    pub assessments: Vec<SkillAssessment>,
    pub matching: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

/// Evaluates every job skill against the candidate's associations.
///
/// A skill is met when the candidate holds it with at least the required
/// years. Met skills (required or preferred) contribute their importance to
/// the numerator; all job skills contribute to the denominator. Only
/// required, unmet skills count as missing. A job with no skill rows has no
/// constraints to fail and scores 100.
///
/// `job_skills` is expected sorted by skill_id (the repository guarantees
/// it) so the assessment list is reproducible.
pub fn score_skills(
    job_skills: &[JobSkillRow],
    candidate_skills: &[CandidateSkillRow],
) -> SkillScore {
    if job_skills.is_empty() {
        return SkillScore {
            component: 100.0,
            assessments: Vec::new(),
            matching: BTreeSet::new(),
            missing: BTreeSet::new(),
        };
    }

    let candidate_years: HashMap<_, _> = candidate_skills
        .iter()
        .map(|cs| (cs.skill_id, cs.years_experience.unwrap_or(0)))
        .collect();

    let mut assessments = Vec::with_capacity(job_skills.len());
    let mut matching = BTreeSet::new();
    let mut missing = BTreeSet::new();
    let mut total_importance = 0i64;
    let mut met_importance = 0i64;

    for js in job_skills {
        let years = candidate_years.get(&js.skill_id).copied();
        let met = years.is_some_and(|y| y >= js.min_years_experience);

        total_importance += i64::from(js.importance);
        if met {
            met_importance += i64::from(js.importance);
            matching.insert(js.skill_name.clone());
        } else if js.is_required {
            missing.insert(js.skill_name.clone());
        }

        assessments.push(SkillAssessment {
            skill_id: js.skill_id,
            skill_name: js.skill_name.clone(),
            is_required: js.is_required,
            min_years_experience: js.min_years_experience,
            importance: js.importance,
            candidate_years: years,
            met,
        });
    }

    let component = if total_importance > 0 {
        met_importance as f64 / total_importance as f64 * 100.0
    } else {
        100.0
    };

    SkillScore {
        component,
        assessments,
        matching,
        missing,
    }
}

/// Combines the two components into the final score and its explanation.
/// `similarity` is the raw cosine similarity, or None when either embedding
/// was unavailable; in that case the result is partial and the score is the
/// skill component alone.
pub fn compose_score(
    skill: SkillScore,
    similarity: Option<f64>,
    partial_reason: Option<String>,
) -> (f64, MatchDetails, BTreeSet<String>, BTreeSet<String>) {
    let (score, semantic, partial, reason) = match similarity {
        Some(sim) => {
            let semantic = semantic_component(sim);
            (
                SEMANTIC_WEIGHT * semantic + SKILL_WEIGHT * skill.component,
                semantic,
                false,
                None,
            )
        }
        None => (
            skill.component,
            0.0,
            true,
            Some(
                partial_reason
                    .unwrap_or_else(|| "embedding unavailable; skill-only scoring".to_string()),
            ),
        ),
    };

    let details = MatchDetails {
        semantic_component: semantic,
        skill_component: skill.component,
        semantic_weight: SEMANTIC_WEIGHT,
        skill_weight: SKILL_WEIGHT,
        partial,
        partial_reason: reason,
        skills: skill.assessments,
    };

    (score, details, skill.matching, skill.missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn job_skill(
        skill_id: Uuid,
        name: &str,
        required: bool,
        min_years: i32,
        importance: i32,
    ) -> JobSkillRow {
        JobSkillRow {
            job_id: Uuid::new_v4(),
            skill_id,
            skill_name: name.to_string(),
            is_required: required,
            min_years_experience: min_years,
            importance,
        }
    }

    fn candidate_skill(skill_id: Uuid, name: &str, years: Option<i32>) -> CandidateSkillRow {
        CandidateSkillRow {
            candidate_id: Uuid::new_v4(),
            skill_id,
            skill_name: name.to_string(),
            years_experience: years,
            proficiency_level: None,
            is_highlighted: false,
        }
    }

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = [0.5f32, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_mismatched_lengths_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_semantic_component_clamps_negative() {
        assert_eq!(semantic_component(-0.4), 0.0);
        assert_eq!(semantic_component(1.7), 100.0);
        assert!((semantic_component(0.5) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_job_skills_scores_100() {
        let result = score_skills(&[], &[candidate_skill(Uuid::new_v4(), "rust", Some(5))]);
        assert_eq!(result.component, 100.0);
        assert!(result.matching.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_required_met_and_preferred_unmet() {
        // Job: Python required (min 3 years, importance 8), Docker preferred
        // (importance 2). Candidate: Python with 5 years, no Docker.
        let python = Uuid::new_v4();
        let docker = Uuid::new_v4();
        let job_skills = vec![
            job_skill(python, "python", true, 3, 8),
            job_skill(docker, "docker", false, 0, 2),
        ];
        let cand_skills = vec![candidate_skill(python, "python", Some(5))];

        let result = score_skills(&job_skills, &cand_skills);
        assert!((result.component - 80.0).abs() < 1e-9, "got {}", result.component);
        assert_eq!(
            result.matching.iter().collect::<Vec<_>>(),
            vec![&"python".to_string()]
        );
        // Preferred-only skills are never "missing"
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_required_unmet_is_missing() {
        let rust = Uuid::new_v4();
        let job_skills = vec![job_skill(rust, "rust", true, 5, 10)];
        let cand_skills = vec![candidate_skill(rust, "rust", Some(2))];

        let result = score_skills(&job_skills, &cand_skills);
        assert_eq!(result.component, 0.0);
        assert!(result.missing.contains("rust"));
        assert!(result.matching.is_empty());
    }

    #[test]
    fn test_all_required_met_means_no_missing() {
        let rust = Uuid::new_v4();
        let sql = Uuid::new_v4();
        let job_skills = vec![
            job_skill(rust, "rust", true, 2, 7),
            job_skill(sql, "sql", true, 1, 3),
        ];
        let cand_skills = vec![
            candidate_skill(rust, "rust", Some(4)),
            candidate_skill(sql, "sql", Some(1)),
        ];

        let result = score_skills(&job_skills, &cand_skills);
        assert_eq!(result.component, 100.0);
        assert!(result.missing.is_empty());
        assert_eq!(result.matching.len(), 2);
    }

    #[test]
    fn test_null_years_counts_as_zero() {
        let rust = Uuid::new_v4();
        let job_skills = vec![job_skill(rust, "rust", true, 1, 5)];
        let cand_skills = vec![candidate_skill(rust, "rust", None)];

        let result = score_skills(&job_skills, &cand_skills);
        assert_eq!(result.component, 0.0);
        assert!(result.missing.contains("rust"));
    }

    #[test]
    fn test_zero_min_years_met_by_null_years() {
        let docker = Uuid::new_v4();
        let job_skills = vec![job_skill(docker, "docker", false, 0, 2)];
        let cand_skills = vec![candidate_skill(docker, "docker", None)];

        let result = score_skills(&job_skills, &cand_skills);
        assert_eq!(result.component, 100.0);
        assert!(result.matching.contains("docker"));
    }

    #[test]
    fn test_score_skills_is_deterministic() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let job_skills = vec![
            job_skill(a, "rust", true, 2, 6),
            job_skill(b, "go", false, 0, 4),
        ];
        let cand_skills = vec![candidate_skill(a, "rust", Some(3))];

        let first = score_skills(&job_skills, &cand_skills);
        let second = score_skills(&job_skills, &cand_skills);
        assert_eq!(first.component, second.component);
        assert_eq!(first.matching, second.matching);
        assert_eq!(first.missing, second.missing);
    }

    #[test]
    fn test_compose_full_score() {
        let skill = score_skills(&[], &[]);
        // similarity 1.0 -> semantic 100; skill 100 -> 0.6*100 + 0.4*100 = 100
        let (score, details, _, _) = compose_score(skill, Some(1.0), None);
        assert!((score - 100.0).abs() < 1e-9);
        assert!(!details.partial);
    }

    #[test]
    fn test_compose_weighted_blend() {
        let python = Uuid::new_v4();
        let docker = Uuid::new_v4();
        let job_skills = vec![
            job_skill(python, "python", true, 3, 8),
            job_skill(docker, "docker", false, 0, 2),
        ];
        let cand_skills = vec![candidate_skill(python, "python", Some(5))];
        let skill = score_skills(&job_skills, &cand_skills);

        // semantic = 50, skill = 80 -> 0.6*50 + 0.4*80 = 62
        let (score, details, matching, missing) = compose_score(skill, Some(0.5), None);
        assert!((score - 62.0).abs() < 1e-9, "got {score}");
        assert!((details.semantic_component - 50.0).abs() < 1e-9);
        assert!((details.skill_component - 80.0).abs() < 1e-9);
        assert!(matching.contains("python"));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_compose_partial_falls_back_to_skill_only() {
        let python = Uuid::new_v4();
        let job_skills = vec![job_skill(python, "python", true, 3, 8)];
        let cand_skills = vec![candidate_skill(python, "python", Some(5))];
        let skill = score_skills(&job_skills, &cand_skills);

        let (score, details, _, _) =
            compose_score(skill, None, Some("embedding provider timed out".to_string()));
        // Skill-only: 8/8 met -> 100, not 0.4 * 100
        assert!((score - 100.0).abs() < 1e-9);
        assert!(details.partial);
        assert_eq!(
            details.partial_reason.as_deref(),
            Some("embedding provider timed out")
        );
        assert_eq!(details.semantic_component, 0.0);
    }
}
