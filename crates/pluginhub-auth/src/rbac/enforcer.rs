//! Permission enforcement against the codes carried in a token.

use std::collections::HashSet;

use pluginhub_core::error::AppError;

use super::permissions::{Permission, WILDCARD};

/// The set of permission codes granted to a caller.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    codes: HashSet<String>,
}

impl PermissionSet {
    /// Build from raw codes; unknown codes are kept but never match.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the set contains the wildcard.
    pub fn is_super_admin(&self) -> bool {
        self.codes.contains(WILDCARD)
    }

    /// Whether `permission` is granted.
    pub fn allows(&self, permission: Permission) -> bool {
        self.is_super_admin() || self.codes.contains(permission.code())
    }
}

/// Checks that `granted` includes `permission`.
///
/// Returns `Ok(())` if allowed, or an authorization error if denied.
pub fn require_permission(granted: &PermissionSet, permission: Permission) -> Result<(), AppError> {
    if granted.allows(permission) {
        Ok(())
    } else {
        Err(AppError::authorization(format!(
            "Missing permission '{permission}'"
        )))
    }
}
