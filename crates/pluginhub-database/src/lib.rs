//! # pluginhub-database
//!
//! PostgreSQL connection management, embedded migrations, and the plugin
//! repositories (PostgreSQL and in-memory) behind the [`PluginStore`] trait.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{MemoryPluginRepository, PluginRepository, PluginStore};
