//! # pluginhub-core
//!
//! Core crate for PluginHub. Contains configuration schemas, the unified
//! error system, pagination/sorting/filter types, and the cache trait
//! shared by the other crates.
//!
//! This crate has **no** internal dependencies on other PluginHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
