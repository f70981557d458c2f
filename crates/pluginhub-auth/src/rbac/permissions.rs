//! Permission codes understood by the plugin marketplace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Code that grants every permission.
pub const WILDCARD: &str = "*";

/// A marketplace operation that needs an explicit grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Refresh the catalog from the remote registry.
    #[serde(rename = "settings:plugin:sync")]
    PluginSync,
    /// Download an artifact.
    #[serde(rename = "settings:plugin:download")]
    PluginDownload,
    /// Install an artifact into the plugin directory.
    #[serde(rename = "settings:plugin:install")]
    PluginInstall,
    /// Remove an artifact from the plugin directory.
    #[serde(rename = "settings:plugin:uninstall")]
    PluginUninstall,
    /// Delete a downloaded artifact.
    #[serde(rename = "settings:plugin:delete")]
    PluginDelete,
}

impl Permission {
    /// Every permission.
    pub const ALL: [Permission; 5] = [
        Permission::PluginSync,
        Permission::PluginDownload,
        Permission::PluginInstall,
        Permission::PluginUninstall,
        Permission::PluginDelete,
    ];

    /// The permission code as it appears in tokens.
    pub fn code(self) -> &'static str {
        match self {
            Self::PluginSync => "settings:plugin:sync",
            Self::PluginDownload => "settings:plugin:download",
            Self::PluginInstall => "settings:plugin:install",
            Self::PluginUninstall => "settings:plugin:uninstall",
            Self::PluginDelete => "settings:plugin:delete",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.code() == s.trim())
            .ok_or_else(|| format!("Unknown permission code: {s}"))
    }
}
