//! Plugin marketplace service.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use pluginhub_cache::keys;
use pluginhub_core::config::MarketConfig;
use pluginhub_core::error::AppError;
use pluginhub_core::traits::CacheProvider;
use pluginhub_core::types::PageResponse;
use pluginhub_database::PluginStore;
use pluginhub_entity::plugin::Plugin;
use pluginhub_registry::ArtifactRegistry;
use pluginhub_storage::ArtifactStorage;

use crate::context::RequestContext;

use super::query::parse_pro_table;

/// Plugin an artifact operation acts on, plus an optional version
/// override. Without a version the stored selection is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginTarget {
    /// Plugin primary key.
    pub id: i32,
    /// Requested version.
    pub version: Option<String>,
}

impl PluginTarget {
    /// Target the stored version of `id`.
    pub fn new(id: i32) -> Self {
        Self { id, version: None }
    }

    /// Target a specific version of `id`.
    pub fn with_version(id: i32, version: impl Into<String>) -> Self {
        Self {
            id,
            version: Some(version.into()),
        }
    }
}

/// Outcome of a catalog sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Matches reported by the remote catalog.
    pub num_found: u64,
    /// Search pages fetched.
    pub pages: u32,
    /// Catalog rows inserted or refreshed.
    pub upserted: u64,
}

/// Orchestrates the plugin store, remote registry, artifact storage and
/// cache for every marketplace operation.
#[derive(Debug)]
pub struct PluginMarketService {
    store: Arc<dyn PluginStore>,
    registry: Arc<dyn ArtifactRegistry>,
    storage: Arc<ArtifactStorage>,
    cache: Arc<dyn CacheProvider>,
    config: MarketConfig,
    /// Held for the whole duration of a sync.
    sync_lock: Mutex<()>,
    /// Serializes artifact operations per plugin id.
    plugin_locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl PluginMarketService {
    /// Creates a new marketplace service.
    pub fn new(
        store: Arc<dyn PluginStore>,
        registry: Arc<dyn ArtifactRegistry>,
        storage: Arc<ArtifactStorage>,
        cache: Arc<dyn CacheProvider>,
        config: MarketConfig,
    ) -> Self {
        Self {
            store,
            registry,
            storage,
            cache,
            config,
            sync_lock: Mutex::new(()),
            plugin_locks: DashMap::new(),
        }
    }

    /// Refresh the catalog from the remote search API.
    ///
    /// Pages through the search results until every match is consumed or
    /// `max_pages` is reached. Fails with `Conflict` when a sync is
    /// already running.
    pub async fn sync_market_data(&self, ctx: &RequestContext) -> Result<SyncReport, AppError> {
        let _guard = self
            .sync_lock
            .try_lock()
            .map_err(|_| AppError::conflict("A catalog sync is already running"))?;

        info!(user = %ctx.username, keyword = %self.config.search_keyword, "Catalog sync started");

        let mut report = SyncReport::default();
        let mut start = 0u64;
        loop {
            if report.pages >= self.config.max_pages {
                warn!(
                    pages = report.pages,
                    num_found = report.num_found,
                    "Catalog sync stopped at page limit"
                );
                break;
            }

            let page = self
                .registry
                .search_catalog(start, self.config.page_size)
                .await?;
            report.pages += 1;
            report.num_found = page.num_found;

            if page.entries.is_empty() {
                break;
            }
            start += page.entries.len() as u64;

            for entry in &page.entries {
                self.store.upsert_catalog_entry(entry).await?;
                report.upserted += 1;
            }
            debug!(start, num_found = page.num_found, "Catalog page stored");

            if start >= page.num_found {
                break;
            }
        }

        if let Err(e) = self.cache.delete_pattern(&keys::all_plugin_versions()).await {
            warn!(error = %e, "Failed to invalidate cached version lists");
        }

        info!(
            user = %ctx.username,
            upserted = report.upserted,
            pages = report.pages,
            num_found = report.num_found,
            "Catalog sync finished"
        );
        Ok(report)
    }

    /// List plugins for the table view.
    pub async fn select_for_pro_table(&self, params: &Value) -> Result<PageResponse<Plugin>, AppError> {
        let query = parse_pro_table(params);
        self.store.query(&query).await
    }

    /// All published versions of a plugin, newest first. Cached per
    /// plugin for `versions_cache_ttl_seconds`.
    pub async fn query_all_versions(&self, id: i32) -> Result<Vec<String>, AppError> {
        let plugin = self.find(id).await?;
        let key = keys::plugin_versions(&plugin.plugin_id);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str::<Vec<String>>(&cached) {
                Ok(versions) => return Ok(versions),
                Err(e) => warn!(%key, error = %e, "Discarding unreadable cache entry"),
            },
            Ok(None) => {}
            Err(e) => warn!(%key, error = %e, "Version cache lookup failed"),
        }

        let versions = self
            .registry
            .list_versions(&plugin.group_id, &plugin.artifact_id)
            .await?;

        let ttl = Duration::from_secs(self.config.versions_cache_ttl_seconds);
        let encoded = serde_json::to_string(&versions)?;
        if let Err(e) = self.cache.set(&key, &encoded, ttl).await {
            warn!(%key, error = %e, "Failed to cache version list");
        }

        Ok(versions)
    }

    /// Download the selected version of a plugin into the download area.
    pub async fn download_plugin(
        &self,
        ctx: &RequestContext,
        target: PluginTarget,
    ) -> Result<Plugin, AppError> {
        let lock = self.lock_for(target.id);
        let _guard = lock.lock().await;

        let plugin = self.find(target.id).await?;
        let version = selected_version(&plugin, target.version.as_deref())?;
        if plugin.installed && plugin.current_version.as_deref() != Some(version.as_str()) {
            return Err(AppError::conflict(format!(
                "Plugin {} is installed at another version; uninstall it first",
                plugin.plugin_id
            )));
        }

        let (plugin, superseded) = self.download_locked(plugin, Some(&version)).await?;
        if let Some(previous) = superseded {
            self.remove_quietly(&previous).await;
        }
        info!(
            user = %ctx.username,
            plugin_id = %plugin.plugin_id,
            version = plugin.current_version.as_deref().unwrap_or_default(),
            "Plugin downloaded"
        );
        Ok(plugin)
    }

    /// Install the selected version, downloading it first when needed.
    pub async fn install_plugin(
        &self,
        ctx: &RequestContext,
        target: PluginTarget,
    ) -> Result<Plugin, AppError> {
        let lock = self.lock_for(target.id);
        let _guard = lock.lock().await;

        let plugin = self.find(target.id).await?;
        let version = selected_version(&plugin, target.version.as_deref())?;
        let coordinates = plugin.coordinates(version.as_str());

        let present = match &plugin.plugin_local_storage_full_path {
            Some(path) => {
                plugin.has_downloaded(&version) && self.storage.exists(Path::new(path)).await
            }
            None => false,
        };
        let (plugin, superseded) = if present {
            (plugin, None)
        } else {
            self.download_locked(plugin, Some(&version)).await?
        };

        let source = plugin
            .plugin_local_storage_full_path
            .as_deref()
            .map(PathBuf::from)
            .ok_or_else(|| AppError::internal("Downloaded plugin has no local path"))?;
        let installed = self.storage.install(&source, &coordinates).await?;

        if let Some(previous) = plugin.plugin_install_full_path.as_deref() {
            if Path::new(previous) != installed {
                self.remove_quietly(Path::new(previous)).await;
            }
        }

        let plugin = self
            .store
            .mark_installed(plugin.id, &installed.to_string_lossy())
            .await?;
        if let Some(previous) = superseded {
            self.remove_quietly(&previous).await;
        }
        info!(
            user = %ctx.username,
            plugin_id = %plugin.plugin_id,
            %version,
            path = %installed.display(),
            "Plugin installed"
        );
        Ok(plugin)
    }

    /// Remove an installed plugin from the plugin directory.
    pub async fn uninstall_plugin(&self, ctx: &RequestContext, id: i32) -> Result<Plugin, AppError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let plugin = self.find(id).await?;
        if !plugin.installed {
            return Err(AppError::validation(format!(
                "Plugin {} is not installed",
                plugin.plugin_id
            )));
        }

        if let Some(path) = plugin.plugin_install_full_path.as_deref() {
            self.storage.remove(Path::new(path)).await?;
        }

        let plugin = self.store.mark_uninstalled(id).await?;
        info!(user = %ctx.username, plugin_id = %plugin.plugin_id, "Plugin uninstalled");
        Ok(plugin)
    }

    /// Delete the downloaded artifact of a plugin. Installed plugins must
    /// be uninstalled first. The catalog row is kept.
    pub async fn delete_plugin(&self, ctx: &RequestContext, id: i32) -> Result<Plugin, AppError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let plugin = self.find(id).await?;
        if plugin.installed {
            return Err(AppError::conflict(format!(
                "Plugin {} is installed; uninstall it first",
                plugin.plugin_id
            )));
        }

        if let Some(path) = plugin.plugin_local_storage_full_path.as_deref() {
            self.storage.remove(Path::new(path)).await?;
        }

        let plugin = self.store.clear_download(id).await?;
        info!(user = %ctx.username, plugin_id = %plugin.plugin_id, "Plugin artifact deleted");
        Ok(plugin)
    }

    /// Total number of catalog rows.
    pub async fn count(&self) -> Result<u64, AppError> {
        self.store.count().await
    }

    async fn find(&self, id: i32) -> Result<Plugin, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Plugin {id} not found")))
    }

    fn lock_for(&self, id: i32) -> Arc<Mutex<()>> {
        self.plugin_locks.entry(id).or_default().clone()
    }

    /// Download with the per-plugin lock already held. Returns the updated
    /// row and the download file it no longer references, which the caller
    /// removes once nothing else depends on it.
    async fn download_locked(
        &self,
        plugin: Plugin,
        requested: Option<&str>,
    ) -> Result<(Plugin, Option<PathBuf>), AppError> {
        let version = selected_version(&plugin, requested)?;
        let coordinates = plugin.coordinates(version.as_str());
        let dest = self.storage.download_path(&coordinates)?;

        if plugin.has_downloaded(&version) && self.storage.exists(&dest).await {
            debug!(%coordinates, "Artifact already downloaded");
            return Ok((plugin, None));
        }

        self.registry.download(&coordinates, &dest).await?;
        let url = self.registry.download_url(&coordinates);

        let superseded = plugin
            .plugin_local_storage_full_path
            .as_deref()
            .map(PathBuf::from)
            .filter(|previous| *previous != dest);

        let plugin = self
            .store
            .mark_downloaded(plugin.id, &version, &dest.to_string_lossy(), &url)
            .await?;
        Ok((plugin, superseded))
    }

    async fn remove_quietly(&self, path: &Path) {
        if let Err(e) = self.storage.remove(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove superseded artifact");
        }
    }
}

fn selected_version(plugin: &Plugin, requested: Option<&str>) -> Result<String, AppError> {
    plugin.resolve_version(requested).ok_or_else(|| {
        AppError::validation(format!("No version selected for plugin {}", plugin.plugin_id))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use pluginhub_cache::MemoryCacheProvider;
    use pluginhub_core::config::{CacheConfig, StorageConfig};
    use pluginhub_core::error::ErrorKind;
    use pluginhub_core::result::AppResult;
    use pluginhub_database::MemoryPluginRepository;
    use pluginhub_entity::plugin::{CatalogEntry, Coordinates};
    use pluginhub_registry::CatalogPage;

    /// Registry serving a fixed catalog and writing a marker file per download.
    #[derive(Debug, Default)]
    struct FakeRegistry {
        entries: Vec<CatalogEntry>,
        versions: Vec<String>,
        download_delay: Duration,
        searches: AtomicUsize,
        version_lookups: AtomicUsize,
        downloads: AtomicUsize,
    }

    #[async_trait]
    impl ArtifactRegistry for FakeRegistry {
        async fn search_catalog(&self, start: u64, rows: u32) -> AppResult<CatalogPage> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            let entries = self
                .entries
                .iter()
                .skip(start as usize)
                .take(rows as usize)
                .cloned()
                .collect();
            Ok(CatalogPage {
                num_found: self.entries.len() as u64,
                entries,
            })
        }

        async fn list_versions(&self, _group_id: &str, _artifact_id: &str) -> AppResult<Vec<String>> {
            self.version_lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.versions.clone())
        }

        fn download_url(&self, coordinates: &Coordinates) -> String {
            format!("https://repo.test/{}", coordinates.repository_path())
        }

        async fn download(&self, coordinates: &Coordinates, dest: &Path) -> AppResult<u64> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.download_delay).await;
            if coordinates.version == "missing" {
                return Err(AppError::not_found("no such artifact"));
            }
            tokio::fs::create_dir_all(dest.parent().expect("parent")).await?;
            tokio::fs::write(dest, coordinates.to_string()).await?;
            Ok(coordinates.to_string().len() as u64)
        }
    }

    fn entry(artifact: &str, version: &str) -> CatalogEntry {
        CatalogEntry {
            group_id: "org.apache.flink".to_string(),
            artifact_id: artifact.to_string(),
            latest_version: Some(version.to_string()),
            repository_id: Some("central".to_string()),
            packaging: "jar".to_string(),
            release_timestamp: None,
            version_count: 2,
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        registry: Arc<FakeRegistry>,
        storage: Arc<ArtifactStorage>,
        service: PluginMarketService,
    }

    async fn fixture(entries: Vec<CatalogEntry>, page_size: u32) -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Arc::new(
            ArtifactStorage::new(&StorageConfig {
                download_dir: dir.path().join("downloads").display().to_string(),
                plugin_dir: dir.path().join("plugins").display().to_string(),
            })
            .await
            .expect("storage"),
        );
        let registry = Arc::new(FakeRegistry {
            entries,
            versions: vec!["1.1.0".to_string(), "1.0.0".to_string()],
            ..FakeRegistry::default()
        });
        let config = MarketConfig {
            page_size,
            ..MarketConfig::default()
        };
        let service = PluginMarketService::new(
            Arc::new(MemoryPluginRepository::new()),
            registry.clone(),
            storage.clone(),
            Arc::new(MemoryCacheProvider::new(&CacheConfig::default())),
            config,
        );
        Fixture {
            dir,
            registry,
            storage,
            service,
        }
    }

    async fn synced() -> Fixture {
        let fx = fixture(
            vec![
                entry("flink-sql-connector-kafka", "1.1.0"),
                entry("flink-json", "1.1.0"),
            ],
            200,
        )
        .await;
        fx.service
            .sync_market_data(&RequestContext::system())
            .await
            .expect("sync");
        fx
    }

    #[tokio::test]
    async fn test_sync_pages_through_catalog() {
        let entries = (0..5).map(|i| entry(&format!("connector-{i}"), "1.0.0")).collect();
        let fx = fixture(entries, 2).await;

        let report = fx
            .service
            .sync_market_data(&RequestContext::system())
            .await
            .expect("sync");

        assert_eq!(report.upserted, 5);
        assert_eq!(report.pages, 3);
        assert_eq!(report.num_found, 5);
        assert_eq!(fx.service.count().await.expect("count"), 5);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let fx = synced().await;
        fx.service
            .sync_market_data(&RequestContext::system())
            .await
            .expect("second sync");
        assert_eq!(fx.service.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_concurrent_sync_is_rejected() {
        let fx = fixture(vec![entry("flink-json", "1.0.0")], 200).await;
        let _held = fx.service.sync_lock.lock().await;

        let err = fx
            .service
            .sync_market_data(&RequestContext::system())
            .await
            .expect_err("busy");
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_list_uses_pro_table_params() {
        let fx = synced().await;
        let page = fx
            .service
            .select_for_pro_table(&json!({"current": 1, "pageSize": 10, "name": "kafka"}))
            .await
            .expect("list");
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].artifact_id, "flink-sql-connector-kafka");
    }

    #[tokio::test]
    async fn test_versions_are_cached() {
        let fx = synced().await;
        let first = fx.service.query_all_versions(1).await.expect("versions");
        let second = fx.service.query_all_versions(1).await.expect("versions");

        assert_eq!(first, vec!["1.1.0", "1.0.0"]);
        assert_eq!(first, second);
        assert_eq!(fx.registry.version_lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_versions_of_unknown_plugin() {
        let fx = synced().await;
        let err = fx.service.query_all_versions(99).await.expect_err("missing");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_download_records_state() {
        let fx = synced().await;
        let ctx = RequestContext::system();

        let plugin = fx
            .service
            .download_plugin(&ctx, PluginTarget::with_version(1, "1.0.0"))
            .await
            .expect("download");

        assert!(plugin.downloaded);
        assert_eq!(plugin.current_version.as_deref(), Some("1.0.0"));
        let path = plugin.plugin_local_storage_full_path.expect("path");
        assert!(fx.storage.exists(Path::new(&path)).await);
        assert!(plugin.plugin_download_url.expect("url").ends_with(".jar"));
    }

    #[tokio::test]
    async fn test_redownload_same_version_is_skipped() {
        let fx = synced().await;
        let ctx = RequestContext::system();
        fx.service
            .download_plugin(&ctx, PluginTarget::new(1))
            .await
            .expect("download");
        fx.service
            .download_plugin(&ctx, PluginTarget::new(1))
            .await
            .expect("again");
        assert_eq!(fx.registry.downloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_new_version_replaces_old_download() {
        let fx = synced().await;
        let ctx = RequestContext::system();
        let old = fx
            .service
            .download_plugin(&ctx, PluginTarget::with_version(1, "1.0.0"))
            .await
            .expect("old");
        let old_path = old.plugin_local_storage_full_path.expect("path");

        let new = fx
            .service
            .download_plugin(&ctx, PluginTarget::with_version(1, "1.1.0"))
            .await
            .expect("new");

        assert_eq!(new.current_version.as_deref(), Some("1.1.0"));
        assert!(!fx.storage.exists(Path::new(&old_path)).await);
    }

    #[tokio::test]
    async fn test_failed_download_keeps_state() {
        let fx = synced().await;
        let err = fx
            .service
            .download_plugin(&RequestContext::system(), PluginTarget::with_version(1, "missing"))
            .await
            .expect_err("404");
        assert_eq!(err.kind, ErrorKind::NotFound);

        let page = fx.service.select_for_pro_table(&json!({"id": 1})).await.expect("list");
        assert!(!page.items[0].downloaded);
    }

    #[tokio::test]
    async fn test_install_downloads_when_needed() {
        let fx = synced().await;
        let plugin = fx
            .service
            .install_plugin(&RequestContext::system(), PluginTarget::new(2))
            .await
            .expect("install");

        assert!(plugin.downloaded);
        assert!(plugin.installed);
        let installed = plugin.plugin_install_full_path.expect("install path");
        assert!(installed.starts_with(&*fx.storage.plugin_root().to_string_lossy()));
        assert!(fx.storage.exists(Path::new(&installed)).await);
    }

    #[tokio::test]
    async fn test_install_other_version_replaces_file() {
        let fx = synced().await;
        let ctx = RequestContext::system();
        let first = fx
            .service
            .install_plugin(&ctx, PluginTarget::with_version(1, "1.0.0"))
            .await
            .expect("install");
        let first_path = first.plugin_install_full_path.expect("path");

        let second = fx
            .service
            .install_plugin(&ctx, PluginTarget::with_version(1, "1.1.0"))
            .await
            .expect("upgrade");

        assert!(!fx.storage.exists(Path::new(&first_path)).await);
        assert!(second.plugin_install_full_path.expect("path").ends_with("1.1.0.jar"));
    }

    #[tokio::test]
    async fn test_uninstall_then_delete() {
        let fx = synced().await;
        let ctx = RequestContext::system();
        let installed = fx
            .service
            .install_plugin(&ctx, PluginTarget::new(1))
            .await
            .expect("install");

        let err = fx.service.delete_plugin(&ctx, 1).await.expect_err("installed");
        assert_eq!(err.kind, ErrorKind::Conflict);

        let uninstalled = fx.service.uninstall_plugin(&ctx, 1).await.expect("uninstall");
        assert!(!uninstalled.installed);
        let install_path = installed.plugin_install_full_path.expect("path");
        assert!(!fx.storage.exists(Path::new(&install_path)).await);

        let deleted = fx.service.delete_plugin(&ctx, 1).await.expect("delete");
        assert!(!deleted.downloaded);
        assert!(deleted.plugin_local_storage_full_path.is_none());
        assert_eq!(fx.service.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_uninstall_requires_installed() {
        let fx = synced().await;
        let err = fx
            .service
            .uninstall_plugin(&RequestContext::system(), 1)
            .await
            .expect_err("not installed");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_file() {
        let fx = synced().await;
        let ctx = RequestContext::system();
        let plugin = fx
            .service
            .download_plugin(&ctx, PluginTarget::new(1))
            .await
            .expect("download");
        let path = plugin.plugin_local_storage_full_path.expect("path");
        tokio::fs::remove_file(&path).await.expect("remove");

        let deleted = fx.service.delete_plugin(&ctx, 1).await.expect("delete");
        assert!(!deleted.downloaded);
    }

    fn files_under(root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let Ok(entries) = std::fs::read_dir(root) else {
            return files;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(files_under(&path));
            } else {
                files.push(path);
            }
        }
        files
    }

    #[tokio::test]
    async fn test_concurrent_downloads_of_one_plugin_are_serialized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Arc::new(
            ArtifactStorage::new(&StorageConfig {
                download_dir: dir.path().join("downloads").display().to_string(),
                plugin_dir: dir.path().join("plugins").display().to_string(),
            })
            .await
            .expect("storage"),
        );
        let registry = Arc::new(FakeRegistry {
            entries: vec![entry("flink-json", "1.1.0")],
            download_delay: Duration::from_millis(50),
            ..FakeRegistry::default()
        });
        let service = PluginMarketService::new(
            Arc::new(MemoryPluginRepository::new()),
            registry.clone(),
            storage,
            Arc::new(MemoryCacheProvider::new(&CacheConfig::default())),
            MarketConfig::default(),
        );
        let ctx = RequestContext::system();
        service.sync_market_data(&ctx).await.expect("sync");

        let (first, second) = tokio::join!(
            service.download_plugin(&ctx, PluginTarget::new(1)),
            service.download_plugin(&ctx, PluginTarget::new(1)),
        );

        let first = first.expect("first");
        let second = second.expect("second");
        assert_eq!(registry.downloads.load(Ordering::SeqCst), 1);
        assert_eq!(
            first.plugin_local_storage_full_path,
            second.plugin_local_storage_full_path
        );
    }

    #[tokio::test]
    async fn test_download_other_version_while_installed_is_refused() {
        let fx = synced().await;
        let ctx = RequestContext::system();
        let installed = fx
            .service
            .install_plugin(&ctx, PluginTarget::with_version(1, "1.0.0"))
            .await
            .expect("install");

        let err = fx
            .service
            .download_plugin(&ctx, PluginTarget::with_version(1, "1.1.0"))
            .await
            .expect_err("installed");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(fx.registry.downloads.load(Ordering::SeqCst), 1);

        let page = fx.service.select_for_pro_table(&json!({"id": 1})).await.expect("list");
        assert_eq!(page.items[0], installed);

        fx.service
            .download_plugin(&ctx, PluginTarget::with_version(1, "1.0.0"))
            .await
            .expect("same version");
    }

    #[tokio::test]
    async fn test_upgrade_leaves_no_stale_artifacts() {
        let fx = synced().await;
        let ctx = RequestContext::system();
        fx.service
            .install_plugin(&ctx, PluginTarget::with_version(1, "1.0.0"))
            .await
            .expect("install");
        let upgraded = fx
            .service
            .install_plugin(&ctx, PluginTarget::with_version(1, "1.1.0"))
            .await
            .expect("upgrade");

        let expected = vec![PathBuf::from(
            upgraded.plugin_local_storage_full_path.expect("download path"),
        )];
        assert_eq!(files_under(&fx.dir.path().join("downloads")), expected);
        assert_eq!(files_under(fx.storage.plugin_root()).len(), 1);

        fx.service.uninstall_plugin(&ctx, 1).await.expect("uninstall");
        fx.service.delete_plugin(&ctx, 1).await.expect("delete");
        assert!(files_under(fx.dir.path()).is_empty());
    }
}
