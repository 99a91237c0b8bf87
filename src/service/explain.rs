//! Explainability agent: narrates why a plan was recommended.
//!
//! Falls back to a deterministic template so an explanation is always
//! produced, whatever the LLM does.

use regex::Regex;
use rig::client::CompletionClient;
use rig::providers::openai;

use crate::model::{DecisionExplanation, IncidentMatch, ResponsePlan, RiskAssessment};
use crate::service::llm::LlmClient;

/// Environment variable for the explanation model
const ENV_EXPLAIN_MODEL: &str = "EXPLAIN_MODEL";

/// Default model for explanation generation
const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// Hedging phrases that disqualify a narrative in an operational briefing
const BANNED_PHRASES: &[&str] = &["as an ai", "i cannot", "it seems", "it appears", "perhaps"];

/// Maximum attempts before falling back to the template
const MAX_RETRIES: usize = 3;

const EXPLAIN_SYSTEM_PROMPT: &str = "You are the transparency officer for an AI crisis system. \
You provide clear, evidence-based reasoning that cites past events by name. \
Your output must be structured JSON only and conform to the requested schema.";

/// Service narrating the rationale behind a generated plan
pub struct ExplainService {
    llm_client: Option<LlmClient>,
    model: String,
}

impl ExplainService {
    /// Creates a new explainability service
    ///
    /// Optionally uses the EXPLAIN_MODEL env var (defaults to gpt-4o-mini)
    pub fn new(llm_client: Option<LlmClient>) -> Self {
        let model = std::env::var(ENV_EXPLAIN_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(
            model = %model,
            available = llm_client.is_some(),
            "Explainability service initialized"
        );

        Self { llm_client, model }
    }

    /// Explain why the plan was recommended. Never fails: the template
    /// fallback covers a missing client, API errors, and rejected responses.
    pub async fn explain_decision(
        &self,
        plan: &ResponsePlan,
        risk: &RiskAssessment,
        past_incidents: &[IncidentMatch],
    ) -> DecisionExplanation {
        let Some(llm_client) = self.llm_client.as_ref() else {
            tracing::warn!("No LLM client configured, using fallback explanation");
            return fallback_explanation(risk, past_incidents);
        };

        let prompt = build_explain_prompt(plan, risk, past_incidents);

        let extractor = llm_client
            .openai_client()
            .extractor::<DecisionExplanation>(&self.model)
            .preamble(EXPLAIN_SYSTEM_PROMPT)
            .build();

        for attempt in 1..=MAX_RETRIES {
            match extractor.extract(&prompt).await {
                Ok(explanation) => {
                    let narrative_lower = explanation.narrative.to_lowercase();
                    if let Some(banned) = BANNED_PHRASES
                        .iter()
                        .find(|phrase| narrative_lower.contains(**phrase))
                    {
                        tracing::warn!(
                            attempt = attempt,
                            banned_phrase = banned,
                            "Narrative contains hedging phrase, regenerating"
                        );
                        if attempt < MAX_RETRIES {
                            continue;
                        }
                        // Last attempt failed validation, strip the phrases instead
                        return DecisionExplanation {
                            narrative: sanitize_narrative(&explanation.narrative),
                            confidence_reasoning: explanation.confidence_reasoning,
                        };
                    }
                    return explanation;
                }
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        tracing::warn!(error = %e, "Explanation failed after retries, using fallback");
                        return fallback_explanation(risk, past_incidents);
                    }
                    tracing::debug!(attempt = attempt, error = %e, "Retrying explanation generation");
                }
            }
        }

        fallback_explanation(risk, past_incidents)
    }
}

/// Template used when the LLM cannot produce a usable explanation
fn fallback_explanation(
    risk: &RiskAssessment,
    past_incidents: &[IncidentMatch],
) -> DecisionExplanation {
    DecisionExplanation {
        narrative: format!(
            "Plan generated based on {} risk factors and {} similar historical records.",
            risk.level,
            past_incidents.len()
        ),
        confidence_reasoning: "Fallback explanation due to API error.".to_string(),
    }
}

/// Build the explanation prompt from the plan, risk, and evidence
fn build_explain_prompt(
    plan: &ResponsePlan,
    risk: &RiskAssessment,
    past_incidents: &[IncidentMatch],
) -> String {
    let evidence_summary = past_incidents
        .iter()
        .map(|inc| {
            format!(
                "- {} (Outcome: {})",
                inc.incident_name,
                if inc.outcome.is_empty() {
                    "Unknown"
                } else {
                    inc.outcome.as_str()
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "THE DECISION PLAN: {}\nTHE RISK ASSESSMENT: Level {} (Score {:.2})\nTHE EVIDENCE (Past Events):\n{}\n\nTASK: Write a concise, two-sentence explanation of why this plan was recommended. Explicitly cite the past events as the reason.",
        serde_json::to_string(plan).unwrap_or_default(),
        risk.level,
        risk.score,
        evidence_summary
    )
}

/// Strip hedging phrases and collapse the leftover whitespace
fn sanitize_narrative(narrative: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap();
    let mut sanitized = narrative.to_string();

    for phrase in BANNED_PHRASES {
        let pattern = Regex::new(&format!(r"(?i){}", regex::escape(phrase))).unwrap();
        sanitized = pattern.replace_all(&sanitized, "").to_string();
    }

    whitespace.replace_all(sanitized.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskLevel;

    fn plan() -> ResponsePlan {
        ResponsePlan {
            objective: "Contain the fire".to_string(),
            immediate_actions: vec!["Evacuate Sector 4".to_string()],
            resource_requests: vec!["Foam tender".to_string()],
            hazards_to_monitor: vec!["Flashover".to_string()],
        }
    }

    fn risk() -> RiskAssessment {
        RiskAssessment {
            level: RiskLevel::High,
            score: 0.65,
            flagged_factors: Vec::new(),
        }
    }

    #[test]
    fn test_fallback_names_level_and_record_count() {
        let incidents = vec![
            IncidentMatch {
                incident_name: "Metro Textile Fire".to_string(),
                outcome: "Roof collapsed.".to_string(),
                similarity: 0.9,
                year: None,
                action_taken: None,
            };
            2
        ];

        let explanation = fallback_explanation(&risk(), &incidents);
        assert_eq!(
            explanation.narrative,
            "Plan generated based on HIGH risk factors and 2 similar historical records."
        );
        assert_eq!(
            explanation.confidence_reasoning,
            "Fallback explanation due to API error."
        );
    }

    #[test]
    fn test_explain_prompt_cites_evidence() {
        let incidents = vec![IncidentMatch {
            incident_name: "ChemCorp Gas Leak".to_string(),
            outcome: "Toxic cloud drifted South.".to_string(),
            similarity: 0.8,
            year: Some("2023".to_string()),
            action_taken: None,
        }];

        let prompt = build_explain_prompt(&plan(), &risk(), &incidents);
        assert!(prompt.contains("THE RISK ASSESSMENT: Level HIGH (Score 0.65)"));
        assert!(prompt.contains("- ChemCorp Gas Leak (Outcome: Toxic cloud drifted South.)"));
        assert!(prompt.contains("\"immediate_actions\":[\"Evacuate Sector 4\"]"));
    }

    #[test]
    fn test_sanitize_strips_hedging_phrases() {
        let sanitized =
            sanitize_narrative("It seems the plan follows the Metro Textile Fire precedent.");
        assert_eq!(
            sanitized,
            "the plan follows the Metro Textile Fire precedent."
        );
        assert!(!sanitized.to_lowercase().contains("it seems"));
    }
}
