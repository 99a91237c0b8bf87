//! REST API endpoints for the incident memory

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::error::ApiError;
use crate::model::IncidentMatch;
use crate::service::MemoryService;

/// Query parameters for recalling past incidents
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecallParams {
    /// Free-text description of the current event
    pub query: String,
    /// Maximum number of matches to return (default: 3)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecallResponse {
    pub status: String,
    pub data: Vec<IncidentMatch>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedResponse {
    pub status: String,
    pub seeded: usize,
}

/// Recall past incidents similar to a text query
#[utoipa::path(
    get,
    path = "/v1/agent/memory",
    params(RecallParams),
    responses(
        (status = 200, description = "Matches retrieved (status is no_matches when empty)", body = RecallResponse),
        (status = 502, description = "The vector store or embedding API failed"),
        (status = 503, description = "Required API key is not configured")
    ),
    tag = "memory"
)]
#[get("/v1/agent/memory")]
pub async fn recall_memory(
    service: web::Data<MemoryService>,
    query: web::Query<RecallParams>,
) -> Result<HttpResponse, ApiError> {
    let matches = service.recall_patterns(&query.query, query.limit).await?;

    let status = if matches.is_empty() {
        "no_matches"
    } else {
        "success"
    };

    Ok(HttpResponse::Ok().json(RecallResponse {
        status: status.to_string(),
        data: matches,
    }))
}

/// Seed the history collection with the demo incident records
#[utoipa::path(
    post,
    path = "/v1/history/seed",
    responses(
        (status = 200, description = "History seeded", body = SeedResponse),
        (status = 502, description = "The vector store or embedding API failed")
    ),
    tag = "memory"
)]
#[post("/v1/history/seed")]
pub async fn seed_history(service: web::Data<MemoryService>) -> Result<HttpResponse, ApiError> {
    let seeded = service.seed_history().await?;

    Ok(HttpResponse::Ok().json(SeedResponse {
        status: "success".to_string(),
        seeded,
    }))
}

/// Configure memory routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(recall_memory).service(seed_history);
}
