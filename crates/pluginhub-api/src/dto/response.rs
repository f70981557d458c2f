//! Response DTOs: the result envelope and the table result.

use chrono::Local;
use serde::{Deserialize, Serialize};

use pluginhub_core::types::{PageRequest, PageResponse};

/// Outcome codes reported in the `msg` of a result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Generic success.
    Success,
    /// Generic failure.
    Failed,
    /// Catalog sync finished.
    SyncSuccess,
    /// Catalog sync failed.
    SyncFailed,
    /// Artifact downloaded.
    DownloadSuccess,
    /// Artifact download failed.
    DownloadFailed,
    /// Plugin installed.
    InstallSuccess,
    /// Plugin install failed.
    InstallFailed,
    /// Plugin uninstalled.
    UninstallSuccess,
    /// Plugin uninstall failed.
    UninstallFailed,
    /// Downloaded artifact deleted.
    DeleteSuccess,
    /// Artifact delete failed.
    DeleteFailed,
    /// Missing or invalid bearer token.
    NotLogin,
    /// Caller lacks the required permission.
    NoPermission,
    /// Malformed query or body.
    ParamsError,
}

impl Status {
    /// Envelope `code`: 0 on success, 401/403 for auth failures, 1 otherwise.
    pub fn code(self) -> i32 {
        match self {
            Self::NotLogin => 401,
            Self::NoPermission => 403,
            s if s.is_success() => 0,
            _ => 1,
        }
    }

    /// Whether this status reports success.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::Success
                | Self::SyncSuccess
                | Self::DownloadSuccess
                | Self::InstallSuccess
                | Self::UninstallSuccess
                | Self::DeleteSuccess
        )
    }

    /// Human-readable message.
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::SyncSuccess => "Sync Success",
            Self::SyncFailed => "Sync Failed",
            Self::DownloadSuccess => "Download Success",
            Self::DownloadFailed => "Download Failed",
            Self::InstallSuccess => "Install Success",
            Self::InstallFailed => "Install Failed",
            Self::UninstallSuccess => "Uninstall Success",
            Self::UninstallFailed => "Uninstall Failed",
            Self::DeleteSuccess => "Delete Success",
            Self::DeleteFailed => "Delete Failed",
            Self::NotLogin => "Not logged in",
            Self::NoPermission => "No permission",
            Self::ParamsError => "Invalid parameters",
        }
    }
}

/// Uniform result envelope returned by every marketplace endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResult<T> {
    /// 0 on success, 1 on failure, 401/403 for auth failures.
    pub code: i32,
    /// Payload, `null` when there is none.
    pub data: Option<T>,
    /// Status message.
    pub msg: String,
    /// Server local time, `YYYY-MM-DD HH:MM:SS`.
    pub time: String,
    /// Whether the operation succeeded.
    pub success: bool,
}

impl<T> ApiResult<T> {
    fn build(status: Status, data: Option<T>) -> Self {
        Self {
            code: status.code(),
            data,
            msg: status.message().to_string(),
            time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            success: status.is_success(),
        }
    }

    /// Success without payload.
    pub fn succeed(status: Status) -> Self {
        Self::build(status, None)
    }

    /// Success carrying `data` with the generic success status.
    pub fn data(data: T) -> Self {
        Self::build(Status::Success, Some(data))
    }

    /// Failure without payload.
    pub fn failed(status: Status) -> Self {
        Self::build(status, None)
    }
}

/// Result shape expected by the ProTable widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProTableResult<T> {
    /// False when the query could not be served.
    pub success: bool,
    /// Rows on this page.
    pub data: Vec<T>,
    /// Total matching rows.
    pub total: u64,
    /// Current page, 1-based.
    pub current: u64,
    /// Page size.
    pub page_size: u64,
}

impl<T> From<PageResponse<T>> for ProTableResult<T> {
    fn from(page: PageResponse<T>) -> Self {
        Self {
            success: true,
            data: page.items,
            total: page.total_items,
            current: page.page,
            page_size: page.page_size,
        }
    }
}

impl<T> ProTableResult<T> {
    /// An empty failed table echoing the requested page.
    pub fn failed(page: &PageRequest) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            total: 0,
            current: page.page,
            page_size: page.page_size,
        }
    }
}
