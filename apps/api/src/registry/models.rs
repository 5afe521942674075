use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One immutable template version. "Editing" a template means inserting the
/// next version; template_text never changes after insert, so the audit
/// trail of which prompt produced which bias score stays intact.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BiasPromptTemplateRow {
    pub id: Uuid,
    pub name: String,
    pub version: i32,
    pub template_text: String,
    pub description: Option<String>,
    pub bias_evaluated: bool,
    pub bias_score: f64,
    /// JSON array of `BiasFinding` from the creation-time evaluation.
    pub bias_findings: Value,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Selects the winning row when several are flagged active: highest version
/// first, then most recent creation. The caller logs the inconsistency; this
/// function only decides the winner.
pub fn pick_active(mut rows: Vec<BiasPromptTemplateRow>) -> Option<BiasPromptTemplateRow> {
    rows.sort_by(|a, b| {
        b.version
            .cmp(&a.version)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    rows.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn template(version: i32, created_offset_secs: i64) -> BiasPromptTemplateRow {
        BiasPromptTemplateRow {
            id: Uuid::new_v4(),
            name: "resume_parse".to_string(),
            version,
            template_text: "Extract the following fields...".to_string(),
            description: None,
            bias_evaluated: true,
            bias_score: 0.0,
            bias_findings: json!([]),
            is_active: true,
            created_by: None,
            approved_by: None,
            created_at: Utc::now() + Duration::seconds(created_offset_secs),
        }
    }

    #[test]
    fn test_pick_active_empty_is_none() {
        assert!(pick_active(vec![]).is_none());
    }

    #[test]
    fn test_pick_active_prefers_highest_version() {
        let winner = pick_active(vec![template(1, 0), template(3, -100), template(2, 50)]);
        assert_eq!(winner.unwrap().version, 3);
    }

    #[test]
    fn test_pick_active_ties_break_on_created_at() {
        let older = template(2, -100);
        let newer = template(2, 0);
        let newer_id = newer.id;
        let winner = pick_active(vec![older, newer]);
        assert_eq!(winner.unwrap().id, newer_id);
    }
}
