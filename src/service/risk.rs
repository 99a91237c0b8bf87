//! Risk agent: scores recalled incidents against a fixed danger vocabulary.
//!
//! A pure function of its input. No state, no I/O, safe to call from any
//! number of request handlers at once.

use crate::model::{IncidentMatch, RiskAssessment, RiskLevel};

/// Keywords that mark a past outcome as dangerous, scanned in order.
const DANGER_SIGNALS: &[&str] = &[
    "collapse",
    "casualty",
    "casualties",
    "toxic",
    "explosion",
    "flashover",
    "fatality",
    "critical",
    "failure",
];

/// Weight applied when a past outcome contains a danger keyword.
const DANGER_WEIGHT: f64 = 10.0;
/// Baseline weight for any retrieved precedent, dangerous or not.
const BASELINE_WEIGHT: f64 = 2.0;
/// Cap on the accumulated total; also the normalization divisor.
const SCORE_CAP: f64 = 10.0;
/// How many flagged factors to report.
const MAX_FLAGGED_FACTORS: usize = 2;

/// Score recalled incidents into a risk level and normalized confidence.
///
/// Each match contributes `10 * similarity` when its outcome contains a
/// danger keyword (the first keyword in scan order wins) and `2 * similarity`
/// otherwise. The accumulated total is capped at 10 and normalized to [0, 1].
/// Out-of-range similarities are clamped, not trusted.
pub fn assess(matches: &[IncidentMatch]) -> RiskAssessment {
    if matches.is_empty() {
        return RiskAssessment {
            level: RiskLevel::Unknown,
            score: 0.0,
            flagged_factors: Vec::new(),
        };
    }

    let mut accumulated = 0.0_f64;
    let mut reasons = Vec::new();

    for incident in matches {
        let outcome = incident.outcome.to_lowercase();
        let similarity = incident.similarity.clamp(0.0, 1.0);

        match DANGER_SIGNALS.iter().find(|word| outcome.contains(**word)) {
            Some(word) => {
                accumulated += DANGER_WEIGHT * similarity;
                reasons.push(format!(
                    "Past event '{}' had outcome: {}",
                    incident.incident_name, word
                ));
            }
            None => accumulated += BASELINE_WEIGHT * similarity,
        }
    }

    let score = (accumulated.min(SCORE_CAP) / SCORE_CAP).clamp(0.0, 1.0);
    let level = classify(score);
    reasons.truncate(MAX_FLAGGED_FACTORS);

    RiskAssessment {
        level,
        score: round2(score),
        flagged_factors: reasons,
    }
}

/// Map a normalized score onto a risk level. Comparisons are strict, so
/// boundary scores fall into the lower bracket.
fn classify(score: f64) -> RiskLevel {
    if score > 0.7 {
        RiskLevel::Critical
    } else if score > 0.4 {
        RiskLevel::High
    } else if score > 0.2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(name: &str, outcome: &str, similarity: f64) -> IncidentMatch {
        IncidentMatch {
            incident_name: name.to_string(),
            outcome: outcome.to_string(),
            similarity,
            year: None,
            action_taken: None,
        }
    }

    #[test]
    fn test_empty_matches_yield_unknown() {
        let assessment = assess(&[]);
        assert_eq!(assessment.level, RiskLevel::Unknown);
        assert_eq!(assessment.score, 0.0);
        assert!(assessment.flagged_factors.is_empty());
    }

    #[test]
    fn test_single_dangerous_match_maxes_score() {
        let matches = [incident(
            "Metro Textile Fire",
            "total collapse and fatality",
            1.0,
        )];

        let assessment = assess(&matches);
        assert_eq!(assessment.score, 1.0);
        assert_eq!(assessment.level, RiskLevel::Critical);
        // Only the first vocabulary hit is reported for a match.
        assert_eq!(
            assessment.flagged_factors,
            vec!["Past event 'Metro Textile Fire' had outcome: collapse".to_string()]
        );
    }

    #[test]
    fn test_first_keyword_in_scan_order_wins() {
        // "casualty" precedes "critical" and "failure" in the vocabulary, and
        // matches as a substring of "casualties".
        let matches = [incident("Depot Blaze", "critical failure with casualties", 0.5)];

        let assessment = assess(&matches);
        assert_eq!(
            assessment.flagged_factors,
            vec!["Past event 'Depot Blaze' had outcome: casualty".to_string()]
        );
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let matches = [incident("ChemCorp Gas Leak", "TOXIC cloud drifted South", 0.5)];

        let assessment = assess(&matches);
        assert_eq!(assessment.score, 0.5);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_non_dangerous_match_contributes_baseline() {
        let matches = [incident("Road Closure", "minor delay, no injuries", 0.5)];

        let assessment = assess(&matches);
        assert_eq!(assessment.score, 0.1);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.flagged_factors.is_empty());
    }

    #[test]
    fn test_flagged_factors_capped_at_two() {
        let matches = [
            incident("Fire A", "roof collapse", 1.0),
            incident("Fire B", "explosion reported", 1.0),
            incident("Fire C", "toxic fumes", 1.0),
            incident("Fire D", "one fatality", 1.0),
        ];

        let assessment = assess(&matches);
        assert_eq!(assessment.flagged_factors.len(), 2);
        // Discovery order follows the input sequence.
        assert!(assessment.flagged_factors[0].contains("Fire A"));
        assert!(assessment.flagged_factors[1].contains("Fire B"));
        assert_eq!(assessment.score, 1.0);
    }

    #[test]
    fn test_boundary_scores_fall_into_lower_bracket() {
        // Two baseline contributions of 2.0 sum to 4.0, an exact 0.4 score.
        let matches = [
            incident("A", "calm evening", 1.0),
            incident("B", "quiet drill", 1.0),
        ];
        assert_eq!(assess(&matches).level, RiskLevel::Medium);

        // One baseline contribution of 2.0: exactly 0.2 stays LOW.
        let matches = [incident("A", "calm evening", 1.0)];
        assert_eq!(assess(&matches).level, RiskLevel::Low);

        // 10 * 0.5 + 2 * 1.0 = 7.0: exactly 0.7 stays HIGH.
        let matches = [
            incident("A", "partial collapse", 0.5),
            incident("B", "calm evening", 1.0),
        ];
        let assessment = assess(&matches);
        assert_eq!(assessment.score, 0.7);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_score_monotonic_in_similarity() {
        let low = assess(&[incident("A", "roof collapse", 0.3)]);
        let high = assess(&[incident("A", "roof collapse", 0.6)]);
        assert!(high.score >= low.score);

        let low = assess(&[incident("A", "calm evening", 0.25)]);
        let high = assess(&[incident("A", "calm evening", 0.75)]);
        assert!(high.score >= low.score);
    }

    #[test]
    fn test_out_of_range_similarity_clamped() {
        let inflated = assess(&[incident("A", "roof collapse", 3.0)]);
        let unit = assess(&[incident("A", "roof collapse", 1.0)]);
        assert_eq!(inflated.score, unit.score);

        let negative = assess(&[incident("A", "roof collapse", -1.0)]);
        assert_eq!(negative.score, 0.0);
        assert_eq!(negative.level, RiskLevel::Low);
        // A clamped-to-zero match still counts as a dangerous precedent.
        assert_eq!(negative.flagged_factors.len(), 1);
    }

    #[test]
    fn test_score_rounded_to_two_decimals() {
        let assessment = assess(&[incident("A", "roof collapse", 0.333)]);
        assert_eq!(assessment.score, 0.33);
        assert_eq!(assessment.level, RiskLevel::Medium);
    }

    #[test]
    fn test_deserialized_sparse_record_scores_baseline() {
        // A record missing its outcome gets an empty string, so no keyword
        // can match and only the baseline weight applies.
        let sparse: IncidentMatch = serde_json::from_str(r#"{"similarity": 0.9}"#).unwrap();
        let assessment = assess(&[sparse]);
        assert_eq!(assessment.score, 0.18);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.flagged_factors.is_empty());
    }

    #[test]
    fn test_mixed_matches_accumulate() {
        // 10 * 0.25 + 2 * 0.5 = 3.5
        let matches = [
            incident("A", "explosion at depot", 0.25),
            incident("B", "minor delay", 0.5),
        ];
        let assessment = assess(&matches);
        assert_eq!(assessment.score, 0.35);
        assert_eq!(assessment.level, RiskLevel::Medium);
        assert_eq!(assessment.flagged_factors.len(), 1);
    }
}
