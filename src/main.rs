//! A.R.I.A. server binary.

use anyhow::Context;
use aria::{
    db::{EmbeddedVectorStore, StoreClient, VectorStore},
    llm::GeminiClient,
    rag::Embedder,
    sources::{ArxivClient, PerplexityClient},
    AppState, Config,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting Research Assistant backend...");

    let config = Arc::new(Config::from_env().context("Failed to load configuration")?);

    // Session/document store
    let store = Arc::new(
        StoreClient::open(&config.storage.database_path)
            .await
            .context("Failed to open database")?,
    );
    store
        .ensure_user(&config.user_id, &config.user_id)
        .await
        .context("Failed to initialize user profile")?;

    // Embeddings
    let embedder = build_embedder()?;

    // Vector store
    let vectors = build_vector_store(&config, embedder.dimensions())
        .await
        .context("Failed to open vector store")?;
    tracing::info!("Vector store ready: {}", vectors.provider_name());

    // LLM and search clients
    let llm = Arc::new(GeminiClient::new(
        config.llm.gemini_api_key.clone(),
        config.llm.gemini_base_url.clone(),
        config.llm.gemini_model.clone(),
    )?);
    let arxiv = Arc::new(ArxivClient::new(config.search.arxiv_base_url.clone())?);
    let web = Arc::new(PerplexityClient::new(
        config.search.perplexity_api_key.clone(),
        config.search.perplexity_base_url.clone(),
    )?);

    let state = AppState::new(
        config.clone(),
        store,
        vectors,
        embedder,
        llm,
        arxiv,
        web,
    );

    tracing::info!("All services initialized successfully");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, aria::api::app(state))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(feature = "local-embeddings")]
fn build_embedder() -> anyhow::Result<Arc<dyn Embedder>> {
    let embedder = aria::rag::embeddings::LocalEmbedder::new()
        .context("Failed to load local embedding model")?;
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "local-embeddings"))]
fn build_embedder() -> anyhow::Result<Arc<dyn Embedder>> {
    anyhow::bail!(
        "No embedding backend available. Rebuild with the `local-embeddings` feature enabled."
    )
}

#[cfg(feature = "qdrant")]
async fn build_vector_store(
    config: &Config,
    dimensions: usize,
) -> anyhow::Result<Arc<dyn VectorStore>> {
    if let Some(url) = config.storage.qdrant_url.clone() {
        let store = aria::db::QdrantVectorStore::new(
            url,
            config.storage.qdrant_api_key.clone(),
            dimensions,
        )
        .await?;
        return Ok(Arc::new(store));
    }

    let store =
        EmbeddedVectorStore::new(Some(config.storage.vector_path.clone()), dimensions).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "qdrant"))]
async fn build_vector_store(
    config: &Config,
    dimensions: usize,
) -> anyhow::Result<Arc<dyn VectorStore>> {
    let store =
        EmbeddedVectorStore::new(Some(config.storage.vector_path.clone()), dimensions).await?;
    Ok(Arc::new(store))
}
