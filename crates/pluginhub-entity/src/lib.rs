//! # pluginhub-entity
//!
//! Domain entity models for PluginHub. `Plugin` is the marketplace table
//! row; the remaining types are value objects used to move catalog data
//! and queries between layers.

pub mod plugin;

pub use plugin::{CatalogEntry, Coordinates, Plugin, PluginColumn, PluginQuery};
