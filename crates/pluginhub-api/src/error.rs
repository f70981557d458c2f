//! Maps domain `AppError` to HTTP responses carrying a failed envelope.
//!
//! Handlers and extractors return [`ApiError`], which every `AppError`
//! converts into through `?`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pluginhub_core::error::{AppError, ErrorKind};

use crate::dto::response::{ApiResult, Status};

/// HTTP status and envelope status for an error kind.
pub fn classify(kind: ErrorKind) -> (StatusCode, Status) {
    match kind {
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, Status::NotLogin),
        ErrorKind::Authorization => (StatusCode::FORBIDDEN, Status::NoPermission),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, Status::ParamsError),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, Status::Failed),
        ErrorKind::Conflict => (StatusCode::CONFLICT, Status::Failed),
        ErrorKind::ExternalService => (StatusCode::BAD_GATEWAY, Status::Failed),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, Status::Failed),
    }
}

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let (status, result_status) = classify(error.kind);
        if status.is_server_error() {
            tracing::error!(error = %error, "Request failed");
        } else {
            tracing::debug!(error = %error, "Request rejected");
        }

        (status, Json(ApiResult::<()>::failed(result_status))).into_response()
    }
}
