//! # pluginhub-storage
//!
//! Local filesystem layout for plugin artifacts: the download area that
//! receives artifacts from the repository and the plugin directory the
//! host application loads installed plugins from.

pub mod artifacts;

pub use artifacts::ArtifactStorage;
