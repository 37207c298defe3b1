//! Search server entry point.

use anyhow::Context;
use backend::{
    config::ServerConfig,
    db_utils::search_backend_client::HttpSearchBackend,
    server_extra::{router, search_routes::AppState},
};
use common::FacetCatalog;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    info!("Search settings: {:#?}", config.search);

    let backend = HttpSearchBackend::new(config.backend_url.clone());
    info!("Search backend: {}", backend.url());

    // facet contributors are registered here, before the router is built
    let catalog = FacetCatalog::new();
    info!("Facet contributors: {}", catalog.len());
    let app = router(AppState::new(config.search, catalog, backend));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
