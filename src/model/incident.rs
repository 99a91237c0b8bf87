use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sensor modality of an ingested intel item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Audio,
    Image,
}

/// Output of the perception stage: an embedding plus a human-readable
/// description of what was perceived.
#[derive(Debug, Clone)]
pub struct PerceivedIntel {
    pub vector: Vec<f32>,
    pub description: String,
    pub modality: Modality,
}

/// One retrieved historical incident, scored against the current query.
///
/// Stored payloads are not trusted to be complete: a missing name becomes a
/// placeholder and a missing outcome an empty string, so one malformed record
/// never fails a whole assessment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncidentMatch {
    #[serde(default = "default_incident_name")]
    pub incident_name: String,
    #[serde(default)]
    pub outcome: String,
    /// Similarity to the current query in [0, 1], supplied by vector search.
    #[serde(default)]
    pub similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
}

fn default_incident_name() -> String {
    "Unknown".to_string()
}

/// Risk classification derived from the normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Unknown => "UNKNOWN",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        })
    }
}

/// Result of scoring recalled incidents against the danger vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Normalized confidence score in [0, 1], rounded to two decimals.
    pub score: f64,
    /// Up to two human-readable reasons naming the top contributing matches.
    pub flagged_factors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_match_defaults_missing_fields() {
        let incident: IncidentMatch = serde_json::from_str(r#"{"similarity": 0.9}"#).unwrap();
        assert_eq!(incident.incident_name, "Unknown");
        assert_eq!(incident.outcome, "");
        assert_eq!(incident.similarity, 0.9);
        assert!(incident.year.is_none());
        assert!(incident.action_taken.is_none());
    }

    #[test]
    fn test_risk_level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"CRITICAL\""
        );
        assert_eq!(
            serde_json::from_str::<RiskLevel>("\"UNKNOWN\"").unwrap(),
            RiskLevel::Unknown
        );
    }
}
