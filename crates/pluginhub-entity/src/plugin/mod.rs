//! Plugin marketplace entities.

pub mod coordinates;
pub mod model;
pub mod query;

pub use coordinates::Coordinates;
pub use model::{CatalogEntry, Plugin};
pub use query::{PluginColumn, PluginQuery};
