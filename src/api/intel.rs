//! REST API endpoint for ingesting raw sensor intel

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::service::{MemoryService, PerceptionService};

/// Multipart upload: the raw file plus its modality and capture location
#[derive(Debug, MultipartForm)]
pub struct IngestForm {
    #[multipart(limit = "25MB")]
    pub file: TempFile,
    #[multipart(rename = "type")]
    pub kind: Text<String>,
    pub location: Text<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    pub status: String,
    /// Id of the stored point in the live collection
    pub id: String,
    /// Human-readable description of what was perceived
    pub intel: String,
}

/// Ingest a raw audio or image file, perceive it, and store it in live memory
#[utoipa::path(
    post,
    path = "/v1/ingest",
    responses(
        (status = 200, description = "Intel ingested", body = IngestResponse),
        (status = 400, description = "Unknown intel type"),
        (status = 502, description = "An upstream AI service failed"),
        (status = 503, description = "Required API key is not configured")
    ),
    tag = "intel"
)]
#[post("/v1/ingest")]
pub async fn ingest_intel(
    perception: web::Data<PerceptionService>,
    memory: web::Data<MemoryService>,
    MultipartForm(form): MultipartForm<IngestForm>,
) -> Result<HttpResponse, ApiError> {
    let filename = form
        .file
        .file_name
        .clone()
        .unwrap_or_else(|| "upload".to_string());
    let bytes = std::fs::read(form.file.file.path())
        .map_err(|e| ApiError::Internal(format!("Failed to read upload: {}", e)))?;

    tracing::info!(
        kind = %form.kind.as_str(),
        file = %filename,
        bytes = bytes.len(),
        "Ingesting intel"
    );

    let intel = match form.kind.as_str() {
        "audio" => perception.process_audio(bytes, &filename).await?,
        "image" => perception.process_image(&bytes).await?,
        other => {
            return Err(ApiError::BadRequest(format!(
                "Unknown intel type '{}', expected 'audio' or 'image'",
                other
            )));
        }
    };

    let id = memory.store_intel(&intel, form.location.as_str()).await?;

    Ok(HttpResponse::Ok().json(IngestResponse {
        status: "success".to_string(),
        id,
        intel: intel.description,
    }))
}

/// Configure intel routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ingest_intel);
}
