pub mod decision;
pub mod embedding;
pub mod explain;
pub mod llm;
pub mod memory;
pub mod perception;
pub mod qdrant;
pub mod risk;
pub mod transcription;

pub use decision::DecisionService;
pub use embedding::EmbeddingClient;
pub use explain::ExplainService;
pub use llm::LlmClient;
pub use memory::MemoryService;
pub use perception::PerceptionService;
pub use qdrant::QdrantClient;
pub use transcription::TranscriptionClient;
