//! Decision agent: generates a structured response plan with an LLM.

use rig::client::CompletionClient;
use rig::providers::openai;

use crate::model::{IncidentMatch, ResponsePlan, RiskAssessment};
use crate::service::llm::LlmClient;

/// Environment variable for the plan generation model
const ENV_DECISION_MODEL: &str = "DECISION_MODEL";

/// Default model for plan generation
const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// System prompt for plan generation
const DECISION_SYSTEM_PROMPT: &str = "You are AURA, an AI crisis commander. \
Base every action on the current situation, the assessed risk level, and the \
cited past incidents; prefer actions that worked before. \
Your output must be structured JSON only and conform to the requested schema.";

#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("No LLM client configured")]
    Unavailable,

    #[error("Plan generation failed: {0}")]
    PlanGenerationFailed(String),
}

/// Service generating response plans from situation, risk, and history
pub struct DecisionService {
    llm_client: Option<LlmClient>,
    model: String,
}

impl DecisionService {
    /// Creates a new decision service
    ///
    /// Optionally uses the DECISION_MODEL env var (defaults to gpt-4o-mini)
    pub fn new(llm_client: Option<LlmClient>) -> Self {
        let model =
            std::env::var(ENV_DECISION_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(
            model = %model,
            available = llm_client.is_some(),
            "Decision service initialized"
        );

        Self { llm_client, model }
    }

    /// Generate a response plan for the current situation
    pub async fn generate_plan(
        &self,
        current_description: &str,
        risk: &RiskAssessment,
        past_incidents: &[IncidentMatch],
    ) -> Result<ResponsePlan, DecisionError> {
        let llm_client = self.llm_client.as_ref().ok_or(DecisionError::Unavailable)?;

        let start_time = std::time::Instant::now();
        let prompt = build_decision_prompt(current_description, risk, past_incidents);

        tracing::debug!(
            model = %self.model,
            incidents = past_incidents.len(),
            "Initiating plan generation"
        );

        let extractor = llm_client
            .openai_client()
            .extractor::<ResponsePlan>(&self.model)
            .preamble(DECISION_SYSTEM_PROMPT)
            .build();

        match extractor.extract(&prompt).await {
            Ok(plan) => {
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    actions = plan.immediate_actions.len(),
                    "Plan generated"
                );
                Ok(plan)
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    error = %e,
                    "Plan generation failed"
                );
                Err(DecisionError::PlanGenerationFailed(e.to_string()))
            }
        }
    }
}

/// Build the plan prompt from the situation, risk, and recalled incidents
fn build_decision_prompt(
    current_description: &str,
    risk: &RiskAssessment,
    past_incidents: &[IncidentMatch],
) -> String {
    let past_context = if past_incidents.is_empty() {
        "No similar past incidents on record.".to_string()
    } else {
        past_incidents
            .iter()
            .enumerate()
            .map(|(i, inc)| {
                format!(
                    "- Event {}: {} | Outcome: {} | Action: {}",
                    i + 1,
                    inc.incident_name,
                    if inc.outcome.is_empty() {
                        "Unknown outcome"
                    } else {
                        inc.outcome.as_str()
                    },
                    inc.action_taken.as_deref().unwrap_or("No action recorded"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "CURRENT SITUATION: \"{}\"\nRISK LEVEL: {} (score {:.2})\n\nHISTORY:\n{}\n\nTASK: Generate a response plan for the current situation.",
        current_description, risk.level, risk.score, past_context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskLevel;

    fn risk(level: RiskLevel, score: f64) -> RiskAssessment {
        RiskAssessment {
            level,
            score,
            flagged_factors: Vec::new(),
        }
    }

    #[test]
    fn test_prompt_lists_incidents_with_defaults() {
        let incidents = vec![
            IncidentMatch {
                incident_name: "Metro Textile Fire".to_string(),
                outcome: "Roof collapsed.".to_string(),
                similarity: 0.9,
                year: Some("2022".to_string()),
                action_taken: Some("Evacuated North Wing immediately.".to_string()),
            },
            IncidentMatch {
                incident_name: "Unknown".to_string(),
                outcome: String::new(),
                similarity: 0.4,
                year: None,
                action_taken: None,
            },
        ];

        let prompt = build_decision_prompt(
            "Heavy smoke in Sector 4",
            &risk(RiskLevel::Critical, 0.95),
            &incidents,
        );

        assert!(prompt.contains("CURRENT SITUATION: \"Heavy smoke in Sector 4\""));
        assert!(prompt.contains("RISK LEVEL: CRITICAL (score 0.95)"));
        assert!(prompt.contains("Event 1: Metro Textile Fire | Outcome: Roof collapsed."));
        assert!(prompt.contains("Event 2: Unknown | Outcome: Unknown outcome | Action: No action recorded"));
    }

    #[test]
    fn test_prompt_notes_empty_history() {
        let prompt = build_decision_prompt("Flooding", &risk(RiskLevel::Unknown, 0.0), &[]);
        assert!(prompt.contains("No similar past incidents on record."));
    }
}
