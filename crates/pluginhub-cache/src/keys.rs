//! Cache key builders.

/// Prefix shared by all version-list keys.
pub const VERSIONS_PREFIX: &str = "plugin:versions:";

/// Key holding the version list of one `group:artifact`.
pub fn plugin_versions(plugin_id: &str) -> String {
    format!("{VERSIONS_PREFIX}{plugin_id}")
}

/// Pattern matching every version-list key.
pub fn all_plugin_versions() -> String {
    format!("{VERSIONS_PREFIX}*")
}
