//! Plugin repositories.

pub mod memory;
pub mod plugin;

use async_trait::async_trait;

use pluginhub_core::result::AppResult;
use pluginhub_core::types::PageResponse;
use pluginhub_entity::plugin::{CatalogEntry, Plugin, PluginQuery};

pub use memory::MemoryPluginRepository;
pub use plugin::PluginRepository;

/// Persistence operations the marketplace service needs.
///
/// State-changing methods return the updated row and fail with
/// `NotFound` when the id does not exist.
#[async_trait]
pub trait PluginStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a plugin by primary key.
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Plugin>>;

    /// Insert a catalog entry or refresh the remote fields of an existing
    /// one. Local download/install state is preserved.
    async fn upsert_catalog_entry(&self, entry: &CatalogEntry) -> AppResult<Plugin>;

    /// Run a filtered, sorted, paginated list query.
    async fn query(&self, query: &PluginQuery) -> AppResult<PageResponse<Plugin>>;

    /// Record a completed download of `version`.
    async fn mark_downloaded(
        &self,
        id: i32,
        version: &str,
        local_path: &str,
        download_url: &str,
    ) -> AppResult<Plugin>;

    /// Forget the downloaded artifact.
    async fn clear_download(&self, id: i32) -> AppResult<Plugin>;

    /// Record that the artifact was copied into the plugin directory.
    async fn mark_installed(&self, id: i32, install_path: &str) -> AppResult<Plugin>;

    /// Record that the artifact was removed from the plugin directory.
    async fn mark_uninstalled(&self, id: i32) -> AppResult<Plugin>;

    /// Total number of rows.
    async fn count(&self) -> AppResult<u64>;
}
