//! Wire types of the Maven search API.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use pluginhub_entity::plugin::CatalogEntry;

/// Top-level search response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Result section.
    pub response: SearchBody,
}

/// Hits and hit count.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    /// Total matches.
    #[serde(default)]
    pub num_found: u64,
    /// Documents on this page.
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// One artifact document. Artifact searches fill `latest_version` and
/// `version_count`; GAV searches fill `v`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDoc {
    /// `group:artifact` or `group:artifact:version`.
    #[serde(default)]
    pub id: String,
    /// Group id.
    pub g: String,
    /// Artifact id.
    pub a: String,
    /// Version (GAV core only).
    #[serde(default)]
    pub v: Option<String>,
    /// Latest version (artifact core only).
    #[serde(default)]
    pub latest_version: Option<String>,
    /// Repository identifier.
    #[serde(default)]
    pub repository_id: Option<String>,
    /// Packaging.
    #[serde(default)]
    pub p: Option<String>,
    /// Release time in epoch milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Number of versions.
    #[serde(default)]
    pub version_count: Option<i32>,
}

impl SearchDoc {
    /// Release time as UTC.
    pub fn released_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Convert an artifact document into a catalog entry.
    pub fn into_catalog_entry(self) -> CatalogEntry {
        let released = self.released_at();
        CatalogEntry {
            packaging: artifact_extension(self.p.as_deref()).to_string(),
            group_id: self.g,
            artifact_id: self.a,
            latest_version: self.latest_version.filter(|v| !v.is_empty()),
            repository_id: self.repository_id,
            release_timestamp: released,
            version_count: self.version_count.unwrap_or(0),
        }
    }
}

/// File extension for a Maven packaging type.
pub fn artifact_extension(packaging: Option<&str>) -> &str {
    match packaging.map(str::trim) {
        None | Some("") | Some("bundle") | Some("maven-plugin") | Some("jar") => "jar",
        Some(other) => other,
    }
}

/// Versions from GAV documents ordered newest first, without duplicates.
pub fn versions_newest_first(mut docs: Vec<SearchDoc>) -> Vec<String> {
    docs.sort_by(|a, b| b.timestamp.unwrap_or(0).cmp(&a.timestamp.unwrap_or(0)));
    let mut versions: Vec<String> = Vec::with_capacity(docs.len());
    for doc in docs {
        if let Some(version) = doc.v.filter(|v| !v.is_empty()) {
            if !versions.contains(&version) {
                versions.push(version);
            }
        }
    }
    versions
}
