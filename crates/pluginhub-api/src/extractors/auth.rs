//! `AuthUser` extractor: validates the bearer token and injects the request context.
//!
//! [`Authorized`] additionally checks a permission. Parts extractors run
//! before the body is read, so an unauthorized caller gets 403 even when
//! the body or query would not parse.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use pluginhub_auth::Permission;
use pluginhub_core::error::AppError;
use pluginhub_service::RequestContext;

use crate::error::ApiError;
use crate::middleware::rbac::require_permission;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode(token)?;
        Ok(AuthUser(RequestContext::from_claims(&claims)))
    }
}

/// Type-level permission requirement for [`Authorized`].
pub trait RequiredPermission {
    const PERMISSION: Permission;
}

macro_rules! required_permission {
    ($($name:ident => $permission:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl RequiredPermission for $name {
                const PERMISSION: Permission = Permission::$permission;
            }
        )*
    };
}

required_permission! {
    CanSync => PluginSync,
    CanDownload => PluginDownload,
    CanInstall => PluginInstall,
    CanUninstall => PluginUninstall,
    CanDelete => PluginDelete,
}

/// An authenticated user holding `P::PERMISSION`. Rejects with 401 when the
/// token is missing or invalid and 403 when the permission is absent.
#[derive(Debug, Clone)]
pub struct Authorized<P>(pub AuthUser, PhantomData<P>);

impl<P> std::ops::Deref for Authorized<P> {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<P> FromRequestParts<AppState> for Authorized<P>
where
    P: RequiredPermission + Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_permission(&user, P::PERMISSION)?;
        Ok(Authorized(user, PhantomData))
    }
}
