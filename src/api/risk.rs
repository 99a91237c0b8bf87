//! REST API endpoint for the risk agent

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::model::IncidentMatch;
use crate::service::risk;

/// Past incidents recalled for the current situation
#[derive(Debug, Deserialize, ToSchema)]
pub struct RiskRequest {
    #[serde(default)]
    pub similar_incidents: Vec<IncidentMatch>,
}

/// Assess the risk level implied by recalled past incidents
#[utoipa::path(
    post,
    path = "/v1/agent/risk",
    request_body = RiskRequest,
    responses(
        (status = 200, description = "Risk assessed", body = crate::model::RiskAssessment)
    ),
    tag = "agents"
)]
#[post("/v1/agent/risk")]
pub async fn assess_risk(request: web::Json<RiskRequest>) -> HttpResponse {
    let assessment = risk::assess(&request.similar_incidents);

    tracing::info!(
        level = %assessment.level,
        score = assessment.score,
        matches = request.similar_incidents.len(),
        "Risk assessed"
    );

    HttpResponse::Ok().json(assessment)
}

/// Configure risk routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(assess_risk);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    use crate::model::{RiskAssessment, RiskLevel};

    #[actix_web::test]
    async fn test_risk_endpoint_scores_dangerous_history() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/agent/risk")
            .set_json(serde_json::json!({
                "similar_incidents": [{
                    "incident_name": "Metro Textile Fire",
                    "outcome": "Flashover occurred in 5 mins. Roof collapsed.",
                    "similarity": 0.9
                }]
            }))
            .to_request();

        let assessment: RiskAssessment = test::call_and_read_body_json(&app, req).await;
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert_eq!(assessment.score, 0.9);
        assert_eq!(assessment.flagged_factors.len(), 1);
    }

    #[actix_web::test]
    async fn test_risk_endpoint_handles_empty_history() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/agent/risk")
            .set_json(serde_json::json!({ "similar_incidents": [] }))
            .to_request();

        let assessment: RiskAssessment = test::call_and_read_body_json(&app, req).await;
        assert_eq!(assessment.level, RiskLevel::Unknown);
        assert_eq!(assessment.score, 0.0);
        assert!(assessment.flagged_factors.is_empty());
    }
}
