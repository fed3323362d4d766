mod api;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use askdoc_core::Config;
use askdoc_ingest::{chunk_text, create_embedder, embed_chunks, load_corpus};
use askdoc_llm::AnswerGenerator;
use askdoc_retrieval::Retriever;

use state::AppState;

fn load_config() -> Config {
    askdoc_core::config::load_dotenv();
    Config::from_env()
}

/// One-time blocking startup pipeline: corpus → chunks → embeddings → index.
/// The server does not bind until this completes — no partially built index
/// is ever visible to a request.
async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    info!("Loading corpus from {}", config.document.file.display());
    let text = load_corpus(&config.document.file)?;

    let chunks = chunk_text(&text, config.document.chunk_size);
    info!(
        "Document split into {} chunks of up to {} words",
        chunks.len(),
        config.document.chunk_size
    );

    let embedder = create_embedder(&config.embedding)?;

    info!("Embedding chunks ({} provider)...", config.embedding.provider);
    let vectors = embed_chunks(embedder.clone(), &chunks, config.embedding.batch_size).await?;
    info!("Embedded {} chunks", vectors.len());

    let retriever = Retriever::new(embedder, chunks, vectors, config.retrieval.top_k)?;
    let generator = AnswerGenerator::from_config(&config.llm)?;

    Ok(AppState {
        retriever,
        generator,
    })
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::index_page))
        .route("/health", get(api::health))
        .route("/ask", post(api::ask))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = load_config();
    config.log_summary();

    let state = Arc::new(build_state(&config).await?);
    info!(
        "Retrieval pipeline ready: {} chunks indexed",
        state.retriever.chunk_count()
    );

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
