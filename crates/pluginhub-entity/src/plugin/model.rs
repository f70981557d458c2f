//! Plugin entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::coordinates::Coordinates;

/// A marketplace plugin as stored in the `plugin_marketing` table.
///
/// Remote catalog fields are refreshed on every sync; `downloaded`,
/// `installed`, the local paths and (once downloaded) `current_version`
/// belong to this host and survive syncs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    /// Primary key.
    pub id: i32,
    /// Catalog identity, `"groupId:artifactId"`.
    pub plugin_id: String,
    /// Display name.
    pub name: String,
    /// URL the current version was (or will be) downloaded from.
    pub plugin_download_url: Option<String>,
    /// Absolute path of the downloaded artifact.
    pub plugin_local_storage_full_path: Option<String>,
    /// Absolute path of the artifact copy inside the plugin directory.
    pub plugin_install_full_path: Option<String>,
    /// Publishing organization (the Maven group).
    pub organization: Option<String>,
    /// Repository the artifact was found in.
    pub repository_id: Option<String>,
    /// Release time of the latest version.
    pub plugin_release_timestamp: Option<DateTime<Utc>>,
    /// Free-form description.
    pub description: Option<String>,
    /// Maven group id.
    pub group_id: String,
    /// Maven artifact id.
    pub artifact_id: String,
    /// Packaging / file extension, usually `jar`.
    pub packaging: String,
    /// Latest version known to the catalog.
    pub latest_version: Option<String>,
    /// Selected version; the downloaded one once `downloaded` is set.
    pub current_version: Option<String>,
    /// Number of published versions.
    pub version_count: i32,
    /// Whether an artifact has been downloaded.
    pub downloaded: bool,
    /// Whether the artifact is present in the plugin directory.
    pub installed: bool,
    /// Row creation time.
    pub create_time: DateTime<Utc>,
    /// Last update time.
    pub update_time: DateTime<Utc>,
}

impl Plugin {
    /// Coordinates of the given version of this plugin.
    pub fn coordinates(&self, version: impl Into<String>) -> Coordinates {
        Coordinates::new(
            self.group_id.clone(),
            self.artifact_id.clone(),
            version,
            self.packaging.clone(),
        )
    }

    /// The version an operation should act on: the requested one when
    /// present, otherwise the stored selection, otherwise the latest.
    pub fn resolve_version(&self, requested: Option<&str>) -> Option<String> {
        requested
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| self.current_version.clone())
            .or_else(|| self.latest_version.clone())
    }

    /// Whether `version` is the one currently downloaded.
    pub fn has_downloaded(&self, version: &str) -> bool {
        self.downloaded && self.current_version.as_deref() == Some(version)
    }
}

/// One artifact as reported by the remote catalog during sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Maven group id.
    pub group_id: String,
    /// Maven artifact id.
    pub artifact_id: String,
    /// Latest published version.
    pub latest_version: Option<String>,
    /// Repository identifier.
    pub repository_id: Option<String>,
    /// Packaging, e.g. `jar`.
    pub packaging: String,
    /// Release time of the latest version.
    pub release_timestamp: Option<DateTime<Utc>>,
    /// Number of published versions.
    pub version_count: i32,
}

impl CatalogEntry {
    /// Catalog identity, `"groupId:artifactId"`.
    pub fn plugin_id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}
