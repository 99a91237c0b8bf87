//! Memory agent: stores embedded intel and recalls similar past incidents.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::model::{IncidentMatch, MemoryConfig, Modality, PerceivedIntel};
use crate::service::embedding::{EmbeddingClient, EmbeddingError};
use crate::service::qdrant::{PointStruct, QdrantClient, QdrantError};

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Vector store error: {0}")]
    Store(#[from] QdrantError),
}

/// Demo knowledge base: (embed text, incident name, year, outcome, action taken)
const SEED_HISTORY: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Factory fire with black smoke and chemical smell. Solvents present.",
        "Metro Textile Fire",
        "2022",
        "Flashover occurred in 5 mins. Roof collapsed.",
        "Evacuated North Wing immediately. Used foam, not water.",
    ),
    (
        "Flood waters rising in urban area near river banks. People trapped on rooftops.",
        "City River Flash Flood",
        "2021",
        "Roads blocked by debris. Power grid failed.",
        "Deployed boat teams to Sector 4. Cut power to grid.",
    ),
    (
        "Chemical leak in industrial zone. Yellow gas cloud visible.",
        "ChemCorp Gas Leak",
        "2023",
        "Toxic cloud drifted South. Respiratory distress reported.",
        "Issued shelter-in-place order. Sealed storm drains.",
    ),
];

/// Service wrapping the vector store with the domain's memory operations
pub struct MemoryService {
    qdrant: Arc<QdrantClient>,
    embedding: Arc<EmbeddingClient>,
    config: MemoryConfig,
}

impl MemoryService {
    pub fn new(
        qdrant: Arc<QdrantClient>,
        embedding: Arc<EmbeddingClient>,
        config: MemoryConfig,
    ) -> Self {
        Self {
            qdrant,
            embedding,
            config,
        }
    }

    /// Create the live and history collections if missing. Runs at startup so
    /// every agent can assume they exist.
    pub async fn init_collections(&self) -> Result<(), MemoryError> {
        let vectors = [
            ("text_vec", self.embedding.text_dimensions()),
            ("image_vec", self.embedding.image_dimensions()),
        ];
        self.qdrant
            .ensure_collection(&self.config.live_collection, &vectors)
            .await?;
        self.qdrant
            .ensure_collection(&self.config.history_collection, &vectors)
            .await?;
        Ok(())
    }

    /// Store perceived intel in the live collection. Returns the point id.
    pub async fn store_intel(
        &self,
        intel: &PerceivedIntel,
        location: &str,
    ) -> Result<String, MemoryError> {
        let id = Uuid::new_v4().to_string();

        // Both named vectors must be present; the unused modality is zero-filled.
        let (text_vec, image_vec) = match intel.modality {
            Modality::Audio => (
                intel.vector.clone(),
                vec![0.0; self.embedding.image_dimensions()],
            ),
            Modality::Image => (
                vec![0.0; self.embedding.text_dimensions()],
                intel.vector.clone(),
            ),
        };

        let point = PointStruct {
            id: id.clone(),
            vector: HashMap::from([("text_vec", text_vec), ("image_vec", image_vec)]),
            payload: json!({
                "type": intel.modality,
                "description": intel.description,
                "location": location,
                "timestamp": Utc::now().to_rfc3339(),
                "processed_by": "perception-v1",
            }),
        };

        self.qdrant
            .upsert(&self.config.live_collection, vec![point])
            .await?;

        tracing::info!(id = %id, location = %location, "Stored live intel");
        Ok(id)
    }

    /// Recall the most similar past incidents for a text query
    pub async fn recall_patterns(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<IncidentMatch>, MemoryError> {
        let limit = limit.unwrap_or(self.config.recall_limit);
        let vector = self.embedding.embed_text(query).await?;
        let points = self
            .qdrant
            .query(&self.config.history_collection, "text_vec", &vector, limit)
            .await?;

        let matches: Vec<IncidentMatch> = points
            .into_iter()
            .map(|point| incident_from_payload(point.score, &point.payload))
            .collect();

        tracing::info!(query = %query, matches = matches.len(), "Recalled past incidents");
        Ok(matches)
    }

    /// Seed the history collection with the canonical demo incidents
    pub async fn seed_history(&self) -> Result<usize, MemoryError> {
        let mut points = Vec::with_capacity(SEED_HISTORY.len());

        for (text, name, year, outcome, action) in SEED_HISTORY {
            let vector = self.embedding.embed_text(text).await?;
            points.push(PointStruct {
                id: Uuid::new_v4().to_string(),
                vector: HashMap::from([
                    ("text_vec", vector),
                    ("image_vec", vec![0.0; self.embedding.image_dimensions()]),
                ]),
                payload: json!({
                    "incident_name": name,
                    "year": year,
                    "outcome": outcome,
                    "action_taken": action,
                }),
            });
        }

        let count = points.len();
        self.qdrant
            .upsert(&self.config.history_collection, points)
            .await?;

        tracing::info!(incidents = count, "Seeded incident history");
        Ok(count)
    }
}

/// Map a stored payload onto an incident match, defaulting missing fields so
/// one malformed record never fails a whole recall.
fn incident_from_payload(score: f64, payload: &Value) -> IncidentMatch {
    IncidentMatch {
        incident_name: payload
            .get("incident_name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        outcome: payload
            .get("outcome")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        similarity: (score * 100.0).round() / 100.0,
        year: payload
            .get("year")
            .and_then(Value::as_str)
            .map(str::to_string),
        action_taken: payload
            .get("action_taken")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_from_full_payload() {
        let payload = json!({
            "incident_name": "Metro Textile Fire",
            "year": "2022",
            "outcome": "Flashover occurred in 5 mins. Roof collapsed.",
            "action_taken": "Evacuated North Wing immediately. Used foam, not water.",
        });

        let incident = incident_from_payload(0.8934, &payload);
        assert_eq!(incident.incident_name, "Metro Textile Fire");
        assert_eq!(incident.similarity, 0.89);
        assert_eq!(incident.year.as_deref(), Some("2022"));
    }

    #[test]
    fn test_incident_from_sparse_payload_defaults_fields() {
        let incident = incident_from_payload(0.5, &json!({}));
        assert_eq!(incident.incident_name, "Unknown");
        assert_eq!(incident.outcome, "");
        assert_eq!(incident.similarity, 0.5);
        assert!(incident.year.is_none());
        assert!(incident.action_taken.is_none());
    }

    #[test]
    fn test_incident_from_null_payload() {
        let incident = incident_from_payload(0.25, &Value::Null);
        assert_eq!(incident.incident_name, "Unknown");
        assert_eq!(incident.outcome, "");
    }
}
