//! Registry abstraction used by the marketplace service.

use std::path::Path;

use async_trait::async_trait;

use pluginhub_core::result::AppResult;
use pluginhub_entity::plugin::{CatalogEntry, Coordinates};

/// One page of catalog search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    /// Total number of matches reported by the catalog.
    pub num_found: u64,
    /// Entries on this page.
    pub entries: Vec<CatalogEntry>,
}

/// Remote source of plugin metadata and artifacts.
#[async_trait]
pub trait ArtifactRegistry: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch one page of the plugin catalog starting at row `start`.
    async fn search_catalog(&self, start: u64, rows: u32) -> AppResult<CatalogPage>;

    /// All published versions of `group:artifact`, newest first.
    async fn list_versions(&self, group_id: &str, artifact_id: &str) -> AppResult<Vec<String>>;

    /// Public URL of the artifact file.
    fn download_url(&self, coordinates: &Coordinates) -> String;

    /// Download the artifact to `dest`. The file only appears at `dest`
    /// once the transfer is complete. Returns the number of bytes written.
    async fn download(&self, coordinates: &Coordinates, dest: &Path) -> AppResult<u64>;
}
