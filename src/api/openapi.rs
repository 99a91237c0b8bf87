//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aura Command Center API",
        description = "Crisis-response agents: perception, memory, risk, decision, explainability"
    ),
    paths(
        crate::api::health::liveness,
        crate::api::health::readiness,
        crate::api::intel::ingest_intel,
        crate::api::memory::recall_memory,
        crate::api::memory::seed_history,
        crate::api::risk::assess_risk,
        crate::api::plan::generate_plan,
        crate::api::plan::explain_plan,
    ),
    components(schemas(
        crate::model::IncidentMatch,
        crate::model::RiskAssessment,
        crate::model::RiskLevel,
        crate::model::ResponsePlan,
        crate::model::DecisionExplanation,
        crate::api::health::HealthStatus,
        crate::api::health::ReadinessStatus,
        crate::api::health::DependencyHealth,
        crate::api::intel::IngestResponse,
        crate::api::memory::RecallResponse,
        crate::api::memory::SeedResponse,
        crate::api::risk::RiskRequest,
        crate::api::plan::DecisionRequest,
        crate::api::plan::ExplainRequest,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/yaml")
        .body(ApiDoc::openapi().to_yaml().unwrap())
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
