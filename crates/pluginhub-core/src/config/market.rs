//! Remote plugin catalog configuration.

use serde::{Deserialize, Serialize};

/// Settings for the Maven search API and artifact repository that back
/// the plugin marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Solr-style search endpoint.
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Maven repository base URL used to download artifacts.
    #[serde(default = "default_repository_url")]
    pub repository_url: String,
    /// Search query used to discover plugins during sync.
    #[serde(default = "default_search_keyword")]
    pub search_keyword: String,
    /// Rows requested per search page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound on pages fetched during one sync.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Rows requested when listing all versions of one artifact.
    #[serde(default = "default_version_rows")]
    pub version_rows: u32,
    /// HTTP timeout for registry calls in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// User-Agent sent to the registry.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// How long version lists stay cached, in seconds.
    #[serde(default = "default_versions_ttl")]
    pub versions_cache_ttl_seconds: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            repository_url: default_repository_url(),
            search_keyword: default_search_keyword(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            version_rows: default_version_rows(),
            http_timeout_seconds: default_http_timeout(),
            user_agent: default_user_agent(),
            versions_cache_ttl_seconds: default_versions_ttl(),
        }
    }
}

fn default_search_url() -> String {
    "https://search.maven.org/solrsearch/select".to_string()
}

fn default_repository_url() -> String {
    "https://repo1.maven.org/maven2".to_string()
}

fn default_search_keyword() -> String {
    "flink-sql-connector".to_string()
}

fn default_page_size() -> u32 {
    200
}

fn default_max_pages() -> u32 {
    50
}

fn default_version_rows() -> u32 {
    200
}

fn default_http_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    concat!("pluginhub/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_versions_ttl() -> u64 {
    600
}
