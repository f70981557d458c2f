//! Plugin marketplace handlers.
//!
//! Service failures are reported as HTTP 200 with a failed envelope
//! carrying the operation's status; only authentication, permission and
//! malformed input produce HTTP errors.

use axum::Json;
use axum::extract::State;
use serde_json::Value;
use tracing::warn;

use pluginhub_core::error::AppError;
use pluginhub_entity::Plugin;
use pluginhub_service::market::parse_pro_table;

use crate::dto::request::{IdQuery, PluginRequest};
use crate::dto::response::{ApiResult, ProTableResult, Status};
use crate::extractors::{
    AuthUser, Authorized, CanDelete, CanDownload, CanInstall, CanSync, CanUninstall, JsonBody,
    ValidJson, ValidQuery,
};
use crate::state::AppState;

/// Envelope for an operation that returns no payload.
fn outcome<T>(
    operation: &str,
    result: Result<T, AppError>,
    success: Status,
    failure: Status,
) -> Json<ApiResult<()>> {
    match result {
        Ok(_) => Json(ApiResult::succeed(success)),
        Err(e) => {
            warn!(operation, error = %e, "Plugin operation failed");
            Json(ApiResult::failed(failure))
        }
    }
}

/// GET /api/plugin-marketing/sync
pub async fn sync(
    State(state): State<AppState>,
    auth: Authorized<CanSync>,
) -> Json<ApiResult<()>> {
    let result = state.plugin_market.sync_market_data(&auth).await;
    outcome("sync", result, Status::SyncSuccess, Status::SyncFailed)
}

/// POST /api/plugin-marketing/list
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    JsonBody(params): JsonBody<Value>,
) -> Json<ProTableResult<Plugin>> {
    match state.plugin_market.select_for_pro_table(&params).await {
        Ok(page) => Json(ProTableResult::from(page)),
        Err(e) => {
            warn!(error = %e, "Plugin list query failed");
            Json(ProTableResult::failed(&parse_pro_table(&params).page))
        }
    }
}

/// GET /api/plugin-marketing/query-all-version-by-plugin-id?id=N
pub async fn query_all_versions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidQuery(query): ValidQuery<IdQuery>,
) -> Json<ApiResult<Vec<String>>> {
    match state.plugin_market.query_all_versions(query.id).await {
        Ok(versions) => Json(ApiResult::data(versions)),
        Err(e) => {
            warn!(id = query.id, error = %e, "Version lookup failed");
            Json(ApiResult::failed(Status::Failed))
        }
    }
}

/// POST /api/plugin-marketing/download
pub async fn download(
    State(state): State<AppState>,
    auth: Authorized<CanDownload>,
    ValidJson(request): ValidJson<PluginRequest>,
) -> Json<ApiResult<()>> {
    let result = state
        .plugin_market
        .download_plugin(&auth, request.into())
        .await;
    outcome(
        "download",
        result,
        Status::DownloadSuccess,
        Status::DownloadFailed,
    )
}

/// POST /api/plugin-marketing/install
pub async fn install(
    State(state): State<AppState>,
    auth: Authorized<CanInstall>,
    ValidJson(request): ValidJson<PluginRequest>,
) -> Json<ApiResult<()>> {
    let result = state
        .plugin_market
        .install_plugin(&auth, request.into())
        .await;
    outcome(
        "install",
        result,
        Status::InstallSuccess,
        Status::InstallFailed,
    )
}

/// DELETE /api/plugin-marketing/uninstall?id=N
pub async fn uninstall(
    State(state): State<AppState>,
    auth: Authorized<CanUninstall>,
    ValidQuery(query): ValidQuery<IdQuery>,
) -> Json<ApiResult<()>> {
    let result = state.plugin_market.uninstall_plugin(&auth, query.id).await;
    outcome(
        "uninstall",
        result,
        Status::UninstallSuccess,
        Status::UninstallFailed,
    )
}

/// DELETE /api/plugin-marketing/delete?id=N
pub async fn delete(
    State(state): State<AppState>,
    auth: Authorized<CanDelete>,
    ValidQuery(query): ValidQuery<IdQuery>,
) -> Json<ApiResult<()>> {
    let result = state.plugin_market.delete_plugin(&auth, query.id).await;
    outcome(
        "delete",
        result,
        Status::DeleteSuccess,
        Status::DeleteFailed,
    )
}
