use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod model;
mod service;

use model::Config;
use service::{
    DecisionService, EmbeddingClient, ExplainService, LlmClient, MemoryService, PerceptionService,
    QdrantClient, TranscriptionClient,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    // External collaborators
    let qdrant = Arc::new(QdrantClient::from_env());
    let embedding = Arc::new(EmbeddingClient::new(config.embedding.clone()));
    let transcription = TranscriptionClient::new(config.transcription.clone());
    let llm_client = LlmClient::from_env();

    // Agent services
    let memory_service = web::Data::new(MemoryService::new(
        Arc::clone(&qdrant),
        Arc::clone(&embedding),
        config.memory.clone(),
    ));
    let perception_service = web::Data::new(PerceptionService::new(
        Arc::clone(&embedding),
        transcription,
    ));
    let decision_service = web::Data::new(DecisionService::new(llm_client.clone()));
    let explain_service = web::Data::new(ExplainService::new(llm_client.clone()));
    let llm_data = web::Data::new(llm_client);
    let qdrant_data = web::Data::from(Arc::clone(&qdrant));

    // Create the memory collections up front so every agent can assume they exist
    memory_service
        .init_collections()
        .await
        .expect("Failed to initialize vector store collections");

    tracing::info!("Starting Aura command center on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(memory_service.clone())
            .app_data(perception_service.clone())
            .app_data(decision_service.clone())
            .app_data(explain_service.clone())
            .app_data(llm_data.clone())
            .app_data(qdrant_data.clone())
            .configure(api::health::configure)
            .configure(api::openapi::configure)
            .configure(api::intel::configure)
            .configure(api::memory::configure)
            .configure(api::risk::configure)
            .configure(api::plan::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
