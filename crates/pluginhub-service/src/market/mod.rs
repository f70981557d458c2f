//! Plugin marketplace: catalog sync, listing and artifact lifecycle.

pub mod query;
pub mod service;

pub use query::parse_pro_table;
pub use service::{PluginMarketService, PluginTarget, SyncReport};
