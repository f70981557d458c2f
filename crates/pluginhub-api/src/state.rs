//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use pluginhub_auth::JwtDecoder;
use pluginhub_core::config::AppConfig;
use pluginhub_service::PluginMarketService;
use pluginhub_storage::ArtifactStorage;

/// Shared application state.
///
/// Cloned into every handler by Axum; all fields are `Arc` so clones are
/// cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Bearer token validation.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Local artifact storage.
    pub storage: Arc<ArtifactStorage>,
    /// Marketplace business logic.
    pub plugin_market: Arc<PluginMarketService>,
}
