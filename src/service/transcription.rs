//! Speech-to-text client for audio intel.

use std::env;

use serde::Deserialize;

use crate::model::TranscriptionConfig;

const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Transcript used when no speech-to-text key is configured, so the rest of
/// the pipeline stays testable without credentials.
const MOCK_TRANSCRIPT: &str =
    "Emergency reported. Heavy smoke detected in Sector 4. Chemical smell present.";

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Transcription API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Client for the hosted audio transcription endpoint
pub struct TranscriptionClient {
    client: reqwest::Client,
    config: TranscriptionConfig,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl TranscriptionClient {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_key: env::var(ENV_API_KEY).ok().filter(|k| !k.trim().is_empty()),
        }
    }

    /// Transcribe an audio clip, or return the mock transcript when no key is
    /// configured
    pub async fn transcribe(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<String, TranscriptionError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("No speech-to-text key configured, using mock transcript");
            return Ok(MOCK_TRANSCRIPT.to_string());
        };

        let url = format!("{}/audio/transcriptions", self.config.base_url);

        tracing::debug!(model = %self.config.model, file = %filename, "Transcribing audio");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.model.clone())
            .part("file", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Api { status, body });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text)
    }
}
