//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::dto::response::ApiResult;
use crate::state::AppState;

/// Health report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Whether the plugin store answered.
    pub store: bool,
    /// Whether both storage directories exist.
    pub storage: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResult<HealthResponse>> {
    let store = state.plugin_market.count().await.is_ok();
    let storage = state.storage.health_check().await;

    Json(ApiResult::data(HealthResponse {
        status: if store && storage { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store,
        storage,
    }))
}
