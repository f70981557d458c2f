//! Core type definitions used across the PluginHub workspace.

pub mod filter;
pub mod pagination;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortField};
