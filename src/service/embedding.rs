//! Hosted embedding API clients.
//!
//! Text reports go through an OpenAI-style `/embeddings` endpoint at reduced
//! dimensionality; drone imagery goes through a CLIP-style multimodal
//! endpoint that accepts base64 input.

use std::env;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::model::EmbeddingConfig;

const ENV_TEXT_API_KEY: &str = "OPENAI_API_KEY";
const ENV_IMAGE_API_KEY: &str = "JINA_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("No API key configured for {0} embeddings")]
    MissingApiKey(&'static str),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Embedding API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Embedding API returned no vectors")]
    EmptyResponse,
}

/// Client for the hosted text and image embedding endpoints
pub struct EmbeddingClient {
    client: reqwest::Client,
    config: EmbeddingConfig,
    text_api_key: Option<String>,
    image_api_key: Option<String>,
}

#[derive(Serialize)]
struct TextEmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    dimensions: usize,
}

#[derive(Serialize)]
struct ImageEmbedRequest<'a> {
    model: &'a str,
    input: Vec<ImageInput>,
}

#[derive(Serialize)]
struct ImageInput {
    image: String,
}

// Response models - only the fields we need
#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// API keys come from `OPENAI_API_KEY` (text) and `JINA_API_KEY` (image);
    /// a missing key surfaces as an error on first use, not at startup.
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            text_api_key: env::var(ENV_TEXT_API_KEY).ok().filter(|k| !k.trim().is_empty()),
            image_api_key: env::var(ENV_IMAGE_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn text_dimensions(&self) -> usize {
        self.config.text_dimensions
    }

    pub fn image_dimensions(&self) -> usize {
        self.config.image_dimensions
    }

    /// Embed a text report into the `text_vec` space
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let api_key = self
            .text_api_key
            .as_deref()
            .ok_or(EmbeddingError::MissingApiKey("text"))?;
        let url = format!("{}/embeddings", self.config.text_base_url);

        tracing::debug!(model = %self.config.text_model, chars = text.len(), "Requesting text embedding");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&TextEmbedRequest {
                model: &self.config.text_model,
                input: vec![text],
                dimensions: self.config.text_dimensions,
            })
            .send()
            .await?;

        Self::first_vector(response).await
    }

    /// Embed a raw image into the `image_vec` space
    pub async fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>, EmbeddingError> {
        let api_key = self
            .image_api_key
            .as_deref()
            .ok_or(EmbeddingError::MissingApiKey("image"))?;
        let url = format!("{}/embeddings", self.config.image_base_url);
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

        tracing::debug!(model = %self.config.image_model, bytes = bytes.len(), "Requesting image embedding");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&ImageEmbedRequest {
                model: &self.config.image_model,
                input: vec![ImageInput { image: encoded }],
            })
            .send()
            .await?;

        Self::first_vector(response).await
    }

    async fn first_vector(response: reqwest::Response) -> Result<Vec<f32>, EmbeddingError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api { status, body });
        }

        let parsed: EmbedResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)
    }
}
