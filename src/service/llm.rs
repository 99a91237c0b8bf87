//! Shared LLM client for the decision and explainability agents.

use rig::providers::openai;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Wrapper around the OpenAI provider shared by every LLM-backed agent.
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Build a client from `OPENAI_API_KEY`, or `None` when the key is absent.
    ///
    /// A missing key disables the LLM agents instead of refusing to start;
    /// they fall back to degraded responses.
    pub fn from_env() -> Option<Self> {
        match std::env::var(ENV_OPENAI_API_KEY) {
            Ok(key) if !key.trim().is_empty() => Some(Self {
                client: openai::Client::new(&key),
            }),
            _ => {
                tracing::warn!("OPENAI_API_KEY not set, LLM agents will use fallback responses");
                None
            }
        }
    }

    /// Get a reference to the underlying OpenAI client
    /// Use this to create extractors with custom configuration
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}
