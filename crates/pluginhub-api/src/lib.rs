//! # pluginhub-api
//!
//! HTTP API layer for PluginHub built on Axum.
//!
//! Provides the plugin marketplace endpoints, middleware (CORS, logging,
//! timeouts), extractors, the result envelope DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
