//! # pluginhub-auth
//!
//! Bearer token handling and permission checks. Tokens are HS256 JWTs
//! carrying the caller's permission codes; `*` grants every permission.

pub mod jwt;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use rbac::{Permission, PermissionSet, require_permission};
