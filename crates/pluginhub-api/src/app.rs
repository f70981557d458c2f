//! Application builder: wires configuration into state, and router plus
//! middleware into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use pluginhub_auth::JwtDecoder;
use pluginhub_cache::MemoryCacheProvider;
use pluginhub_core::config::AppConfig;
use pluginhub_core::error::AppError;
use pluginhub_core::traits::CacheProvider;
use pluginhub_database::migration::run_migrations;
use pluginhub_database::{DatabasePool, MemoryPluginRepository, PluginRepository, PluginStore};
use pluginhub_registry::{ArtifactRegistry, MavenRegistry};
use pluginhub_service::PluginMarketService;
use pluginhub_storage::ArtifactStorage;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = &state.config.server;
    let body_limit = server.body_limit_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let cors = build_cors_layer(&server.cors);

    build_router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
}

/// Constructs every component from configuration.
///
/// The plugin store is PostgreSQL (with migrations applied) or in-memory
/// depending on `database.provider`.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let store: Arc<dyn PluginStore> = if config.database.is_postgres() {
        let pool = DatabasePool::connect(&config.database).await?;
        run_migrations(pool.pool()).await?;
        Arc::new(PluginRepository::new(pool.into_pool()))
    } else {
        info!("Using in-memory plugin store");
        Arc::new(MemoryPluginRepository::new())
    };

    let cache: Arc<dyn CacheProvider> = Arc::new(MemoryCacheProvider::new(&config.cache));
    let registry: Arc<dyn ArtifactRegistry> = Arc::new(MavenRegistry::new(&config.market)?);
    let storage = Arc::new(ArtifactStorage::new(&config.storage).await?);
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let plugin_market = Arc::new(PluginMarketService::new(
        store,
        registry,
        Arc::clone(&storage),
        cache,
        config.market.clone(),
    ));

    Ok(AppState {
        config: Arc::new(config),
        jwt_decoder,
        storage,
        plugin_market,
    })
}

/// Runs the PluginHub server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting PluginHub v{}", env!("CARGO_PKG_VERSION"));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("PluginHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("PluginHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
