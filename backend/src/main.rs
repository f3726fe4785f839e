use careerguess::config::Config;
use careerguess::game::{
    Catalog, ChatRewriter, Embedder, FlavorService, GameHost, GameRegistry, HttpEmbedder,
    TrigramEmbedder, spawn_idle_sweeper,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    let embedder: Arc<dyn Embedder> = match &config.embedding {
        Some(embedding) => {
            tracing::info!(url = embedding.api_url, model = embedding.model, "Using remote embeddings");
            Arc::new(HttpEmbedder::new(embedding)?)
        }
        None => {
            tracing::info!("Using local trigram embeddings");
            Arc::new(TrigramEmbedder::default())
        }
    };

    let catalog = Catalog::load(&config.catalog_path, embedder.as_ref()).await?;
    tracing::info!(
        players = catalog.len(),
        dimension = catalog.dimension(),
        "Catalog loaded"
    );

    let registry = Arc::new(GameRegistry::new(
        Arc::new(catalog),
        embedder,
        config.policy.clone(),
    ));

    if let Some(max_idle) = config.session_idle_timeout {
        spawn_idle_sweeper(registry.clone(), max_idle, config.sweep_interval);
    }

    let flavor = match &config.rewrite {
        Some(rewrite) => {
            tracing::info!(model = rewrite.model, "Message rewriting enabled");
            FlavorService::new(
                Arc::new(ChatRewriter::new(rewrite)?),
                rewrite.timeout,
                rewrite.cache_size,
            )
        }
        None => FlavorService::disabled(),
    };

    let host = Arc::new(GameHost::new(registry, flavor));
    let addr = config.addr();

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, careerguess::app(host))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
