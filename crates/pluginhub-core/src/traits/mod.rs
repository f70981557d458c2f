//! Core traits defined in `pluginhub-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
