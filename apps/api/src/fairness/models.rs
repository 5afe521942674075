use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Aggregation scope of one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricScope {
    System,
    Candidate,
    Job,
}

impl MetricScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricScope::System => "system",
            MetricScope::Candidate => "candidate",
            MetricScope::Job => "job",
        }
    }
}

/// One immutable snapshot in the fairness time series. Never updated;
/// "latest" is a query by descending timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FairnessMetricRow {
    pub id: Uuid,
    pub metric_type: String,
    pub metric_data: Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_serializes_snake_case() {
        assert_eq!(serde_json::to_value(MetricScope::System).unwrap(), "system");
        assert_eq!(serde_json::to_value(MetricScope::Job).unwrap(), "job");
    }

    #[test]
    fn test_scope_round_trips() {
        let scope: MetricScope = serde_json::from_str("\"candidate\"").unwrap();
        assert_eq!(scope, MetricScope::Candidate);
        assert_eq!(scope.as_str(), "candidate");
    }
}
