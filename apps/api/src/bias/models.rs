use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// A single detected instance of bias. The `type` tag is the wire and
/// storage discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BiasFinding {
    ProtectedAttribute { attribute: String, context: String },
    BiasedLanguage { term: String, context: String },
}

/// One before/after substitution applied while debiasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub original: String,
    pub replacement: String,
    pub occurrences: usize,
}

/// Audit record for one candidate-processing event. Append-only: rows are
/// never updated after insert (mitigation is recorded at creation time).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BiasAuditRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    /// JSON array of `BiasFinding` about the generated content.
    pub findings: Value,
    /// JSON array of `BiasFinding` about the prompt that produced it.
    pub prompt_bias: Value,
    /// Verbatim prompt text, kept for the compliance trail.
    pub prompt_used: String,
    pub mitigation_applied: bool,
    /// JSON array of human-readable remediation descriptions.
    pub mitigation_actions: Value,
    /// Error marker set when detection degraded (e.g. classifier outage).
    pub degraded: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BiasAuditRow {
    /// True when anything was found in the content or the prompt.
    pub fn has_bias(&self) -> bool {
        let non_empty = |v: &Value| v.as_array().map(|a| !a.is_empty()).unwrap_or(false);
        non_empty(&self.findings) || non_empty(&self.prompt_bias)
    }

    /// Groups content findings by type: attributes for protected-attribute
    /// findings, terms for biased-language findings. A malformed stored
    /// payload degrades to a single error bucket instead of failing.
    pub fn bias_summary(&self) -> Value {
        summarize_findings(&self.findings)
    }
}

/// Builds the grouped summary for a stored findings array.
pub fn summarize_findings(findings: &Value) -> Value {
    let parsed: Result<Vec<BiasFinding>, _> = serde_json::from_value(findings.clone());
    let findings = match parsed {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("stored bias findings failed to parse: {e}");
            return json!({ "error": "Could not parse findings" });
        }
    };

    let mut attributes = Vec::new();
    let mut terms = Vec::new();
    for finding in findings {
        match finding {
            BiasFinding::ProtectedAttribute { attribute, .. } => attributes.push(attribute),
            BiasFinding::BiasedLanguage { term, .. } => terms.push(term),
        }
    }

    let mut summary = serde_json::Map::new();
    if !attributes.is_empty() {
        summary.insert("protected_attribute".to_string(), json!(attributes));
    }
    if !terms.is_empty() {
        summary.insert("biased_language".to_string(), json!(terms));
    }
    Value::Object(summary)
}

/// Audit record for one job-description review. Append-only time series.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobBiasAuditRow {
    pub id: Uuid,
    pub job_id: Uuid,
    /// JSON array of `BiasFinding::BiasedLanguage`.
    pub bias_terms: Value,
    /// JSON array of flagged requirement phrases.
    pub biased_requirements: Value,
    /// 0.0 (clean) to 1.0.
    pub bias_score: f64,
    /// JSON array of recommendation strings.
    pub recommendations: Value,
    /// Auto-rewritten lower-bias version, present when mitigation ran.
    pub debiased_text: Option<String>,
    /// JSON array of `ChangeRecord`.
    pub changes_made: Value,
    pub created_at: DateTime<Utc>,
}

impl JobBiasAuditRow {
    pub fn has_bias(&self) -> bool {
        crate::bias::detection::has_bias(self.bias_score)
    }

    pub fn bias_level(&self) -> &'static str {
        crate::bias::detection::bias_level(self.bias_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_serializes_with_type_tag() {
        let finding = BiasFinding::ProtectedAttribute {
            attribute: "age".to_string(),
            context: "young applicants".to_string(),
        };
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["type"], "protected_attribute");
        assert_eq!(value["attribute"], "age");
    }

    #[test]
    fn test_finding_roundtrips_from_classifier_shape() {
        let raw = json!({
            "type": "biased_language",
            "term": "rockstar",
            "context": "rockstar developer"
        });
        let finding: BiasFinding = serde_json::from_value(raw).unwrap();
        assert_eq!(
            finding,
            BiasFinding::BiasedLanguage {
                term: "rockstar".to_string(),
                context: "rockstar developer".to_string(),
            }
        );
    }

    #[test]
    fn test_summary_groups_by_type() {
        let findings = json!([
            {"type": "protected_attribute", "attribute": "age", "context": "young"},
            {"type": "protected_attribute", "attribute": "gender", "context": "male"},
            {"type": "biased_language", "term": "ninja", "context": "ninja dev"}
        ]);
        let summary = summarize_findings(&findings);
        assert_eq!(summary["protected_attribute"], json!(["age", "gender"]));
        assert_eq!(summary["biased_language"], json!(["ninja"]));
    }

    #[test]
    fn test_summary_degrades_on_malformed_payload() {
        let summary = summarize_findings(&json!([{"type": "unknown_shape"}]));
        assert_eq!(summary["error"], "Could not parse findings");
    }

    #[test]
    fn test_summary_of_empty_findings_is_empty_object() {
        let summary = summarize_findings(&json!([]));
        assert_eq!(summary, json!({}));
    }

    fn audit_row(findings: Value, prompt_bias: Value) -> BiasAuditRow {
        BiasAuditRow {
            id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            findings,
            prompt_bias,
            prompt_used: "Extract candidate data.".to_string(),
            mitigation_applied: false,
            mitigation_actions: json!([]),
            degraded: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_bias_when_prompt_bias_only() {
        let row = audit_row(
            json!([]),
            json!([{"type": "biased_language", "term": "ninja", "context": "ninja"}]),
        );
        assert!(row.has_bias());
    }

    #[test]
    fn test_no_bias_when_both_empty() {
        let row = audit_row(json!([]), json!([]));
        assert!(!row.has_bias());
    }

    fn job_audit_row(score: f64) -> JobBiasAuditRow {
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
    fn test_job_audit_level_derivation() {
        assert_eq!(job_audit_row(0.1).bias_level(), "Low");
        assert!(!job_audit_row(0.1).has_bias());
        assert_eq!(job_audit_row(0.45).bias_level(), "Medium");
        assert!(job_audit_row(0.45).has_bias());
        assert_eq!(job_audit_row(0.8).bias_level(), "High");
    }
}
