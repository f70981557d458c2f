//! # pluginhub-registry
//!
//! Client for the remote plugin catalog: a Solr-style Maven search API
//! for discovery and a Maven 2 repository for artifact downloads.

pub mod maven;
pub mod registry;
pub mod search;

pub use maven::MavenRegistry;
pub use registry::{ArtifactRegistry, CatalogPage};
