//! # pluginhub-service
//!
//! Business logic for the plugin marketplace. Services orchestrate the
//! plugin store, the remote registry, local artifact storage and the
//! cache; HTTP concerns stay in `pluginhub-api`.

pub mod context;
pub mod market;

pub use context::RequestContext;
pub use market::{PluginMarketService, PluginTarget, SyncReport};
