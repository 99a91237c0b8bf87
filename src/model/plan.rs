//! Structured records produced by the LLM-backed agents.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response plan extracted from the decision model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ResponsePlan {
    #[schemars(description = "One-sentence operational objective for the response")]
    pub objective: String,

    #[schemars(description = "Ordered list of actions to execute immediately")]
    pub immediate_actions: Vec<String>,

    #[schemars(description = "Units or equipment to request (e.g. 'foam tender', 'boat team')")]
    pub resource_requests: Vec<String>,

    #[schemars(description = "Hazards that could escalate the situation and must be watched")]
    pub hazards_to_monitor: Vec<String>,
}

/// Natural-language justification for a generated plan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct DecisionExplanation {
    #[schemars(
        description = "Two-sentence explanation of why the plan was recommended, explicitly citing past events"
    )]
    pub narrative: String,

    #[schemars(
        description = "Why the similarity of the cited events justifies confidence in the plan"
    )]
    pub confidence_reasoning: String,
}
