//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};

use pluginhub_auth::{Claims, PermissionSet};

/// Context for the current authenticated request.
///
/// Built from the bearer token and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: i64,
    /// The username (convenience field from JWT claims).
    pub username: String,
    /// Permission codes granted by the token.
    pub permissions: PermissionSet,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: i64, username: String, permissions: PermissionSet) -> Self {
        Self {
            user_id,
            username,
            permissions,
            request_time: Utc::now(),
        }
    }

    /// Context for the given token claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(
            claims.sub,
            claims.username.clone(),
            PermissionSet::new(claims.permissions.iter().cloned()),
        )
    }

    /// Context for operator tooling acting outside an HTTP request.
    pub fn system() -> Self {
        Self::new(0, "system".to_string(), PermissionSet::new(["*"]))
    }
}
