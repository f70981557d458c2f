//! # pluginhub-cache
//!
//! In-memory [`CacheProvider`](pluginhub_core::traits::CacheProvider)
//! backed by moka, plus the cache key builders used by the services.

pub mod keys;
pub mod memory;

pub use memory::MemoryCacheProvider;
