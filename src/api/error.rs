//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::service::decision::DecisionError;
use crate::service::embedding::EmbeddingError;
use crate::service::memory::MemoryError;
use crate::service::perception::PerceptionError;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// An agent is missing its upstream credentials (503)
    #[error("Agent unavailable: {0}")]
    AgentUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// External service error (502)
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AgentUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::AgentUnavailable(_) => "agent_unavailable",
            ApiError::ExternalService(_) => "external_service_error",
            ApiError::Internal(_) => "internal_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<PerceptionError> for ApiError {
    fn from(err: PerceptionError) -> Self {
        match err {
            PerceptionError::Embedding(EmbeddingError::MissingApiKey(kind)) => {
                ApiError::AgentUnavailable(format!("No API key configured for {} embeddings", kind))
            }
            other => ApiError::ExternalService(other.to_string()),
        }
    }
}

impl From<MemoryError> for ApiError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::Embedding(EmbeddingError::MissingApiKey(kind)) => {
                ApiError::AgentUnavailable(format!("No API key configured for {} embeddings", kind))
            }
            other => ApiError::ExternalService(other.to_string()),
        }
    }
}

impl From<DecisionError> for ApiError {
    fn from(err: DecisionError) -> Self {
        match err {
            DecisionError::Unavailable => {
                ApiError::AgentUnavailable("decision agent has no LLM client".to_string())
            }
            DecisionError::PlanGenerationFailed(msg) => {
                ApiError::ExternalService(format!("Plan generation failed: {}", msg))
            }
        }
    }
}
