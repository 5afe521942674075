//! Pure rollup arithmetic over audit rows. The service layer handles the
//! reads and the append; everything here is deterministic so a retried
//! snapshot over the same inputs produces an identical payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bias::models::{BiasAuditRow, JobBiasAuditRow};
use crate::fairness::models::MetricScope;

/// Count of job audits per derived bias level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// The computed statistics stored as a snapshot's `metric_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessStats {
    pub scope: MetricScope,
    pub candidate_audits: usize,
    pub candidate_audits_with_bias: usize,
    pub candidate_mitigation_rate: f64,
    pub degraded_audits: usize,
    pub job_audits: usize,
    pub job_audits_with_bias: usize,
    pub mean_job_bias_score: f64,
    pub job_level_distribution: LevelDistribution,
    /// Audits with bias over all audits in scope, 0.0 when the scope is empty.
    pub biased_fraction: f64,
    /// biased_fraction minus the previous snapshot's; None for the first.
    pub trend_vs_previous: Option<f64>,
}

/// Rolls audit history up into one stats record. `candidate_audits` and
/// `job_audits` must already be filtered to the scope and cutoff; a scope
/// that excludes a family simply passes an empty slice.
pub fn compute_stats(
    scope: MetricScope,
    candidate_audits: &[BiasAuditRow],
    job_audits: &[JobBiasAuditRow],
    previous: Option<&Value>,
) -> FairnessStats {
    let candidate_total = candidate_audits.len();
    let candidate_biased = candidate_audits.iter().filter(|a| a.has_bias()).count();
    let candidate_mitigated = candidate_audits
        .iter()
        .filter(|a| a.mitigation_applied)
        .count();
    let degraded = candidate_audits
        .iter()
        .filter(|a| a.degraded.is_some())
        .count();

    let job_total = job_audits.len();
    let job_biased = job_audits.iter().filter(|a| a.has_bias()).count();
    let mean_job_bias_score = if job_total > 0 {
        job_audits.iter().map(|a| a.bias_score).sum::<f64>() / job_total as f64
    } else {
        0.0
    };

    let mut distribution = LevelDistribution::default();
    for audit in job_audits {
        match audit.bias_level() {
            "Low" => distribution.low += 1,
            "Medium" => distribution.medium += 1,
            _ => distribution.high += 1,
        }
    }

    let total = candidate_total + job_total;
    let biased_fraction = if total > 0 {
        (candidate_biased + job_biased) as f64 / total as f64
    } else {
        0.0
    };

    let trend_vs_previous = previous
        .and_then(|p| p.get("biased_fraction"))
        .and_then(Value::as_f64)
        .map(|prev| biased_fraction - prev);

    FairnessStats {
        scope,
        candidate_audits: candidate_total,
        candidate_audits_with_bias: candidate_biased,
        candidate_mitigation_rate: if candidate_total > 0 {
            candidate_mitigated as f64 / candidate_total as f64
        } else {
            0.0
        },
        degraded_audits: degraded,
        job_audits: job_total,
        job_audits_with_bias: job_biased,
        mean_job_bias_score,
        job_level_distribution: distribution,
        biased_fraction,
        trend_vs_previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn candidate_audit(with_findings: bool, mitigated: bool) -> BiasAuditRow {
        let findings = if with_findings {
            json!([{"type": "biased_language", "term": "ninja", "context": "ninja"}])
        } else {
            json!([])
        };
        BiasAuditRow {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            findings,
            prompt_bias: json!([]),
            prompt_used: "Extract fields.".to_string(),
            mitigation_applied: mitigated,
            mitigation_actions: json!([]),
            degraded: None,
            created_at: Utc::now(),
        }
    }

    fn job_audit(score: f64) -> JobBiasAuditRow {
        JobBiasAuditRow {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            bias_terms: json!([]),
            biased_requirements: json!([]),
            bias_score: score,
            recommendations: json!([]),
            debiased_text: None,
            changes_made: json!([]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_scope_yields_zeroes() {
        let stats = compute_stats(MetricScope::System, &[], &[], None);
        assert_eq!(stats.candidate_audits, 0);
        assert_eq!(stats.job_audits, 0);
        assert_eq!(stats.biased_fraction, 0.0);
        assert!(stats.trend_vs_previous.is_none());
    }

    #[test]
    fn test_biased_fraction_spans_both_families() {
        let candidates = vec![candidate_audit(true, true), candidate_audit(false, false)];
        let jobs = vec![job_audit(0.45), job_audit(0.1)];
        let stats = compute_stats(MetricScope::System, &candidates, &jobs, None);
        // 1 biased candidate audit + 1 biased job audit out of 4 total
        assert!((stats.biased_fraction - 0.5).abs() < 1e-9);
        assert_eq!(stats.candidate_audits_with_bias, 1);
        assert_eq!(stats.job_audits_with_bias, 1);
    }

    #[test]
    fn test_level_distribution_counts() {
        let jobs = vec![job_audit(0.1), job_audit(0.4), job_audit(0.4), job_audit(0.9)];
        let stats = compute_stats(MetricScope::Job, &[], &jobs, None);
        assert_eq!(stats.job_level_distribution.low, 1);
        assert_eq!(stats.job_level_distribution.medium, 2);
        assert_eq!(stats.job_level_distribution.high, 1);
        assert!((stats.mean_job_bias_score - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_mitigation_rate() {
        let candidates = vec![
            candidate_audit(true, true),
            candidate_audit(true, false),
            candidate_audit(false, false),
            candidate_audit(false, false),
        ];
        let stats = compute_stats(MetricScope::Candidate, &candidates, &[], None);
        assert!((stats.candidate_mitigation_rate - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_trend_against_previous_snapshot() {
        let candidates = vec![candidate_audit(true, false)];
        let previous = json!({ "biased_fraction": 0.25 });
        let stats = compute_stats(MetricScope::Candidate, &candidates, &[], Some(&previous));
        // current fraction 1.0, previous 0.25
        assert!((stats.trend_vs_previous.unwrap() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_identical_inputs_produce_identical_payloads() {
        let candidates = vec![candidate_audit(true, true)];
        let jobs = vec![job_audit(0.3)];
        let a = compute_stats(MetricScope::System, &candidates, &jobs, None);
        let b = compute_stats(MetricScope::System, &candidates, &jobs, None);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}
