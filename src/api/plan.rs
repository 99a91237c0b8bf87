//! REST API endpoints for plan generation and explanation

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::model::{IncidentMatch, ResponsePlan, RiskAssessment};
use crate::service::{DecisionService, ExplainService};

/// Request body for plan generation
#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionRequest {
    /// Description of the current situation
    pub current_description: String,
    /// Risk assessment produced by the risk agent
    pub risk_data: RiskAssessment,
    #[serde(default)]
    pub past_incidents: Vec<IncidentMatch>,
}

/// Request body for plan explanation
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExplainRequest {
    pub plan: ResponsePlan,
    pub risk_data: RiskAssessment,
    #[serde(default)]
    pub past_incidents: Vec<IncidentMatch>,
}

/// Generate a structured response plan for the current situation
#[utoipa::path(
    post,
    path = "/v1/agent/decision",
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Plan generated", body = ResponsePlan),
        (status = 502, description = "The LLM call failed"),
        (status = 503, description = "No LLM client configured")
    ),
    tag = "agents"
)]
#[post("/v1/agent/decision")]
pub async fn generate_plan(
    service: web::Data<DecisionService>,
    request: web::Json<DecisionRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let plan = service
        .generate_plan(
            &request.current_description,
            &request.risk_data,
            &request.past_incidents,
        )
        .await?;

    Ok(HttpResponse::Ok().json(plan))
}

/// Explain why a plan was recommended
///
/// Always returns 200: the explainability agent degrades to a template when
/// the LLM is unavailable.
#[utoipa::path(
    post,
    path = "/v1/agent/explain",
    request_body = ExplainRequest,
    responses(
        (status = 200, description = "Explanation produced", body = crate::model::DecisionExplanation)
    ),
    tag = "agents"
)]
#[post("/v1/agent/explain")]
pub async fn explain_plan(
    service: web::Data<ExplainService>,
    request: web::Json<ExplainRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    let explanation = service
        .explain_decision(&request.plan, &request.risk_data, &request.past_incidents)
        .await;

    HttpResponse::Ok().json(explanation)
}

/// Configure plan routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_plan).service(explain_plan);
}
