use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "AURA_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Vector memory configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Collection receiving freshly ingested intel
    pub live_collection: String,
    /// Collection holding historical incident records
    pub history_collection: String,
    /// Default number of matches returned by a recall query
    pub recall_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            live_collection: "live_intel".to_string(),
            history_collection: "historical_patterns".to_string(),
            recall_limit: 3,
        }
    }
}

/// Embedding endpoint configuration
///
/// Text reports and drone imagery go through separate hosted models with
/// different vector sizes; the memory collections are created to match.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub text_base_url: String,
    pub text_model: String,
    pub text_dimensions: usize,
    pub image_base_url: String,
    pub image_model: String,
    pub image_dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            text_base_url: "https://api.openai.com/v1".to_string(),
            text_model: "text-embedding-3-small".to_string(),
            text_dimensions: 384,
            image_base_url: "https://api.jina.ai/v1".to_string(),
            image_model: "jina-clip-v1".to_string(),
            image_dimensions: 512,
        }
    }
}

/// Speech-to-text endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "whisper-1".to_string(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub memory: MemoryConfig,
    pub embedding: EmbeddingConfig,
    pub transcription: TranscriptionConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory: MemoryConfig::default(),
            embedding: EmbeddingConfig::default(),
            transcription: TranscriptionConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            memory: file.memory,
            embedding: file.embedding,
            transcription: file.transcription,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_collections() {
        let config = Config::default();
        assert_eq!(config.memory.live_collection, "live_intel");
        assert_eq!(config.memory.history_collection, "historical_patterns");
        assert_eq!(config.memory.recall_limit, 3);
        assert_eq!(config.embedding.text_dimensions, 384);
        assert_eq!(config.embedding.image_dimensions, 512);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_partial_yaml_overrides_only_given_fields() {
        let yaml = r#"
memory:
  history_collection: drills
embedding:
  text_dimensions: 768
"#;
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.memory.history_collection, "drills");
        assert_eq!(file.memory.live_collection, "live_intel");
        assert_eq!(file.embedding.text_dimensions, 768);
        assert_eq!(file.embedding.text_model, "text-embedding-3-small");
        assert_eq!(file.transcription.model, "whisper-1");
    }
}
