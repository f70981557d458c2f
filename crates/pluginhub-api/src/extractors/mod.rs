//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod query;

pub use auth::{AuthUser, Authorized, CanDelete, CanDownload, CanInstall, CanSync, CanUninstall};
pub use json::{JsonBody, ValidJson};
pub use query::ValidQuery;
