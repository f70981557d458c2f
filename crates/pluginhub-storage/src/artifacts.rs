//! Download area and plugin directory management.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use pluginhub_core::config::StorageConfig;
use pluginhub_core::error::{AppError, ErrorKind};
use pluginhub_core::result::AppResult;
use pluginhub_entity::plugin::Coordinates;

/// Filesystem home of downloaded and installed artifacts.
///
/// Downloads live at `<download_dir>/<groupId>/<file>`, installed copies
/// at `<plugin_dir>/<file>`. Every path handed out or removed is checked
/// to lie under one of the two roots.
#[derive(Debug, Clone)]
pub struct ArtifactStorage {
    download_root: PathBuf,
    plugin_root: PathBuf,
}

impl ArtifactStorage {
    /// Create the storage, creating both root directories.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let download_root = absolute(&config.download_dir)?;
        let plugin_root = absolute(&config.plugin_dir)?;

        for root in [&download_root, &plugin_root] {
            fs::create_dir_all(root).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create storage root: {}", root.display()),
                    e,
                )
            })?;
        }

        info!(
            download_root = %download_root.display(),
            plugin_root = %plugin_root.display(),
            "Artifact storage ready"
        );
        Ok(Self {
            download_root,
            plugin_root,
        })
    }

    /// Plugin directory.
    pub fn plugin_root(&self) -> &Path {
        &self.plugin_root
    }

    /// Whether both roots exist.
    pub async fn health_check(&self) -> bool {
        fs::metadata(&self.download_root).await.is_ok_and(|m| m.is_dir())
            && fs::metadata(&self.plugin_root).await.is_ok_and(|m| m.is_dir())
    }

    /// Where the artifact is stored once downloaded.
    pub fn download_path(&self, coordinates: &Coordinates) -> AppResult<PathBuf> {
        coordinates.validate()?;
        Ok(self
            .download_root
            .join(&coordinates.group_id)
            .join(coordinates.file_name()))
    }

    /// Where the artifact is placed when installed.
    pub fn install_path(&self, coordinates: &Coordinates) -> AppResult<PathBuf> {
        coordinates.validate()?;
        Ok(self.plugin_root.join(coordinates.file_name()))
    }

    /// Whether a regular file exists at `path`.
    pub async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok_and(|m| m.is_file())
    }

    /// Copy a downloaded artifact into the plugin directory and return
    /// the installed path. An existing file with the same name is replaced.
    pub async fn install(&self, source: &Path, coordinates: &Coordinates) -> AppResult<PathBuf> {
        self.ensure_managed(source)?;
        let target = self.install_path(coordinates)?;

        let staging = target.with_extension("installing");
        fs::copy(source, &staging).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Downloaded artifact missing: {}", source.display()))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to copy {} into plugin directory", source.display()),
                    e,
                )
            }
        })?;

        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to place {}", target.display()),
                e,
            ));
        }

        info!(%coordinates, path = %target.display(), "Artifact installed");
        Ok(target)
    }

    /// Remove a managed file. A file that is already gone is not an
    /// error; the return value tells whether something was deleted.
    pub async fn remove(&self, path: &Path) -> AppResult<bool> {
        self.ensure_managed(path)?;

        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed artifact");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Artifact already absent");
                Ok(false)
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to remove {}", path.display()),
                e,
            )),
        }
    }

    /// Refuse paths outside the download area and plugin directory.
    fn ensure_managed(&self, path: &Path) -> AppResult<()> {
        let inside = |root: &Path| {
            path.starts_with(root)
                && path
                    .components()
                    .all(|c| !matches!(c, std::path::Component::ParentDir))
        };
        if inside(&self.download_root) || inside(&self.plugin_root) {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Path is outside managed storage: {}",
                path.display()
            )))
        }
    }
}

fn absolute(path: &str) -> AppResult<PathBuf> {
    std::path::absolute(path).map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Invalid storage path: {path}"),
            e,
        )
    })
}
