//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use pluginhub_service::PluginTarget;

/// Plugin body posted to `/download` and `/install`.
///
/// Clients send the whole table row; only `id` and `currentVersion` are
/// read, everything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PluginRequest {
    /// Plugin primary key.
    #[validate(range(min = 1, message = "id must be positive"))]
    pub id: i32,
    /// Version to act on; the stored one when absent.
    #[serde(default)]
    #[validate(length(max = 128))]
    pub current_version: Option<String>,
}

impl From<PluginRequest> for PluginTarget {
    fn from(request: PluginRequest) -> Self {
        PluginTarget {
            id: request.id,
            version: request.current_version,
        }
    }
}

/// Required `?id=` query parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct IdQuery {
    /// Plugin primary key.
    #[validate(range(min = 1, message = "id must be positive"))]
    pub id: i32,
}
