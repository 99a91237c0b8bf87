//! Perception agent: turns raw sensor uploads into embedded intel.

use std::sync::Arc;

use crate::model::{Modality, PerceivedIntel};
use crate::service::embedding::{EmbeddingClient, EmbeddingError};
use crate::service::transcription::{TranscriptionClient, TranscriptionError};

/// Fixed description for visual intel; imagery carries no transcript.
const IMAGE_DESCRIPTION: &str = "Drone surveillance feed (Visual Data)";

#[derive(Debug, thiserror::Error)]
pub enum PerceptionError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// Service turning audio and image uploads into vectors plus descriptions
pub struct PerceptionService {
    embedding: Arc<EmbeddingClient>,
    transcription: TranscriptionClient,
}

impl PerceptionService {
    pub fn new(embedding: Arc<EmbeddingClient>, transcription: TranscriptionClient) -> Self {
        Self {
            embedding,
            transcription,
        }
    }

    /// Transcribe an audio clip and embed the transcript
    pub async fn process_audio(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<PerceivedIntel, PerceptionError> {
        let transcript = self.transcription.transcribe(bytes, filename).await?;
        let vector = self.embedding.embed_text(&transcript).await?;

        tracing::info!(chars = transcript.len(), "Audio intel perceived");

        Ok(PerceivedIntel {
            vector,
            description: transcript,
            modality: Modality::Audio,
        })
    }

    /// Embed a raw image; the description is a fixed label
    pub async fn process_image(&self, bytes: &[u8]) -> Result<PerceivedIntel, PerceptionError> {
        let vector = self.embedding.embed_image(bytes).await?;

        tracing::info!(bytes = bytes.len(), "Image intel perceived");

        Ok(PerceivedIntel {
            vector,
            description: IMAGE_DESCRIPTION.to_string(),
            modality: Modality::Image,
        })
    }
}
