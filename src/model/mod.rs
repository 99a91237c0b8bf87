pub mod config;
pub mod incident;
pub mod plan;

pub use config::{Config, EmbeddingConfig, MemoryConfig, TranscriptionConfig};
pub use incident::*;
pub use plan::*;
