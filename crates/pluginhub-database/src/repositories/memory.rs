//! In-memory plugin repository.
//!
//! Behaves like [`super::PluginRepository`] without a database; used by
//! tests and by the server when `database.provider = "memory"`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use pluginhub_core::error::AppError;
use pluginhub_core::result::AppResult;
use pluginhub_core::types::PageResponse;
use pluginhub_entity::plugin::{CatalogEntry, Plugin, PluginQuery};

use super::PluginStore;

#[derive(Debug, Default)]
struct MemoryState {
    rows: BTreeMap<i32, Plugin>,
    next_id: i32,
}

/// Plugin store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryPluginRepository {
    state: RwLock<MemoryState>,
}

impl MemoryPluginRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: i32, apply: F) -> AppResult<Plugin>
    where
        F: FnOnce(&mut Plugin) + Send,
    {
        let mut state = self.state.write().await;
        let row = state
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Plugin {id} not found")))?;
        apply(row);
        row.update_time = Utc::now();
        Ok(row.clone())
    }
}

#[async_trait]
impl PluginStore for MemoryPluginRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Plugin>> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn upsert_catalog_entry(&self, entry: &CatalogEntry) -> AppResult<Plugin> {
        let plugin_id = entry.plugin_id();
        let now = Utc::now();
        let mut state = self.state.write().await;

        if let Some(existing) = state.rows.values_mut().find(|p| p.plugin_id == plugin_id) {
            existing.organization = Some(entry.group_id.clone());
            existing.repository_id = entry.repository_id.clone();
            existing.plugin_release_timestamp = entry.release_timestamp;
            existing.packaging = entry.packaging.clone();
            existing.latest_version = entry.latest_version.clone();
            existing.version_count = entry.version_count;
            if !existing.downloaded {
                existing.current_version = entry.latest_version.clone();
            }
            existing.update_time = now;
            return Ok(existing.clone());
        }

        state.next_id += 1;
        let id = state.next_id;
        let row = Plugin {
            id,
            plugin_id,
            name: entry.artifact_id.clone(),
            plugin_download_url: None,
            plugin_local_storage_full_path: None,
            plugin_install_full_path: None,
            organization: Some(entry.group_id.clone()),
            repository_id: entry.repository_id.clone(),
            plugin_release_timestamp: entry.release_timestamp,
            description: None,
            group_id: entry.group_id.clone(),
            artifact_id: entry.artifact_id.clone(),
            packaging: entry.packaging.clone(),
            latest_version: entry.latest_version.clone(),
            current_version: entry.latest_version.clone(),
            version_count: entry.version_count,
            downloaded: false,
            installed: false,
            create_time: now,
            update_time: now,
        };
        state.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn query(&self, query: &PluginQuery) -> AppResult<PageResponse<Plugin>> {
        let state = self.state.read().await;
        let mut matched: Vec<&Plugin> = state.rows.values().filter(|p| query.matches(p)).collect();
        matched.sort_by(|a, b| query.compare(a, b));

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(PageResponse::new(items, &query.page, total))
    }

    async fn mark_downloaded(
        &self,
        id: i32,
        version: &str,
        local_path: &str,
        download_url: &str,
    ) -> AppResult<Plugin> {
        let version = version.to_string();
        let local_path = local_path.to_string();
        let download_url = download_url.to_string();
        self.update(id, move |p| {
            p.downloaded = true;
            p.current_version = Some(version);
            p.plugin_local_storage_full_path = Some(local_path);
            p.plugin_download_url = Some(download_url);
        })
        .await
    }

    async fn clear_download(&self, id: i32) -> AppResult<Plugin> {
        self.update(id, |p| {
            p.downloaded = false;
            p.plugin_local_storage_full_path = None;
            p.current_version = p.latest_version.clone();
        })
        .await
    }

    async fn mark_installed(&self, id: i32, install_path: &str) -> AppResult<Plugin> {
        let install_path = install_path.to_string();
        self.update(id, move |p| {
            p.installed = true;
            p.plugin_install_full_path = Some(install_path);
        })
        .await
    }

    async fn mark_uninstalled(&self, id: i32) -> AppResult<Plugin> {
        self.update(id, |p| {
            p.installed = false;
            p.plugin_install_full_path = None;
        })
        .await
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.state.read().await.rows.len() as u64)
    }
}
