//! Local artifact storage configuration.

use serde::{Deserialize, Serialize};

/// Where downloaded and installed plugin artifacts live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that receives downloaded artifacts.
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
    /// Plugin directory scanned by the host application; installed
    /// artifacts are copied here.
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            plugin_dir: default_plugin_dir(),
        }
    }
}

fn default_download_dir() -> String {
    "./data/downloads".to_string()
}

fn default_plugin_dir() -> String {
    "./data/plugins".to_string()
}
