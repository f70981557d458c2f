//! Permission guards used by handlers.

use pluginhub_auth::Permission;
use pluginhub_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user holds `permission`.
pub fn require_permission(auth: &AuthUser, permission: Permission) -> Result<(), AppError> {
    pluginhub_auth::require_permission(&auth.permissions, permission).inspect_err(|_| {
        tracing::warn!(
            user = %auth.username,
            permission = %permission,
            "Permission denied"
        );
    })
}
