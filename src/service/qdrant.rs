//! Qdrant REST client.
//!
//! Minimal surface over the collections and points APIs; the service owns no
//! vector state of its own.

use std::collections::HashMap;
use std::env;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ENV_QDRANT_URL: &str = "QDRANT_URL";
const ENV_QDRANT_API_KEY: &str = "QDRANT_API_KEY";
const DEFAULT_QDRANT_URL: &str = "http://127.0.0.1:6333";

#[derive(Debug, thiserror::Error)]
pub enum QdrantError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Qdrant returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Client for the Qdrant collections and points REST APIs
pub struct QdrantClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// One scored point returned by a vector query
#[derive(Debug, Deserialize)]
pub struct ScoredPoint {
    pub score: f64,
    #[serde(default)]
    pub payload: Value,
}

/// One point to upsert, with named vectors
#[derive(Debug, Serialize)]
pub struct PointStruct {
    pub id: String,
    pub vector: HashMap<&'static str, Vec<f32>>,
    pub payload: Value,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: HashMap<&'static str, VectorParams>,
}

#[derive(Serialize)]
struct UpsertRequest {
    points: Vec<PointStruct>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    using: &'a str,
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    result: QueryResult,
}

#[derive(Deserialize)]
struct QueryResult {
    points: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ExistsResponse {
    result: ExistsResult,
}

#[derive(Deserialize)]
struct ExistsResult {
    exists: bool,
}

impl QdrantClient {
    /// Connect using `QDRANT_URL` / `QDRANT_API_KEY`
    ///
    /// Defaults to a local instance when `QDRANT_URL` is unset.
    pub fn from_env() -> Self {
        let base_url = env::var(ENV_QDRANT_URL)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let api_key = env::var(ENV_QDRANT_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty());

        tracing::debug!(url = %base_url, "Qdrant client configured");

        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    /// Liveness check against the root healthz endpoint
    pub async fn healthcheck(&self) -> Result<(), QdrantError> {
        let response = self.request(Method::GET, "/healthz").send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Create a collection with named vector spaces unless it already exists
    pub async fn ensure_collection(
        &self,
        name: &str,
        vectors: &[(&'static str, usize)],
    ) -> Result<(), QdrantError> {
        let response = self
            .request(Method::GET, &format!("/collections/{}/exists", name))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let exists: ExistsResponse = response.json().await?;

        if exists.result.exists {
            tracing::debug!(collection = %name, "Collection already exists");
            return Ok(());
        }

        let body = CreateCollectionRequest {
            vectors: vectors
                .iter()
                .map(|(vec_name, size)| {
                    (
                        *vec_name,
                        VectorParams {
                            size: *size,
                            distance: "Cosine",
                        },
                    )
                })
                .collect(),
        };

        let response = self
            .request(Method::PUT, &format!("/collections/{}", name))
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::info!(collection = %name, "Created collection");
        Ok(())
    }

    /// Upsert points, waiting for the write to be applied
    pub async fn upsert(
        &self,
        collection: &str,
        points: Vec<PointStruct>,
    ) -> Result<(), QdrantError> {
        let count = points.len();
        let response = self
            .request(
                Method::PUT,
                &format!("/collections/{}/points?wait=true", collection),
            )
            .json(&UpsertRequest { points })
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::debug!(collection = %collection, points = count, "Upserted points");
        Ok(())
    }

    /// Query the nearest points in a named vector space
    pub async fn query(
        &self,
        collection: &str,
        using: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, QdrantError> {
        let response = self
            .request(
                Method::POST,
                &format!("/collections/{}/points/query", collection),
            )
            .json(&QueryRequest {
                query: vector,
                using,
                limit,
                with_payload: true,
            })
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let parsed: QueryResponse = response.json().await?;

        Ok(parsed.result.points)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, QdrantError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(QdrantError::Api { status, body })
        }
    }
}
