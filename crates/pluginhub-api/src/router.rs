//! Route definitions for the PluginHub HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::Router;
use axum::routing::{delete, get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with every route bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/plugin-marketing", plugin_market_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Marketplace endpoints: sync, list, versions, artifact lifecycle
fn plugin_market_routes() -> Router<AppState> {
    use handlers::plugin_market;

    Router::new()
        .route("/sync", get(plugin_market::sync))
        .route("/list", post(plugin_market::list))
        .route(
            "/query-all-version-by-plugin-id",
            get(plugin_market::query_all_versions),
        )
        .route("/download", post(plugin_market::download))
        .route("/install", post(plugin_market::install))
        .route("/uninstall", delete(plugin_market::uninstall))
        .route("/delete", delete(plugin_market::delete))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
