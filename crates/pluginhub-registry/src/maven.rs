//! Maven Central client built on reqwest.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::{Client, StatusCode, Url};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use pluginhub_core::config::MarketConfig;
use pluginhub_core::error::{AppError, ErrorKind};
use pluginhub_core::result::AppResult;
use pluginhub_entity::plugin::Coordinates;

use crate::registry::{ArtifactRegistry, CatalogPage};
use crate::search::{SearchResponse, versions_newest_first};

/// Registry backed by the Maven search API and a Maven 2 repository.
#[derive(Debug, Clone)]
pub struct MavenRegistry {
    client: Client,
    search_url: String,
    repository_url: String,
    keyword: String,
    version_rows: u32,
}

impl MavenRegistry {
    /// Build the client from configuration.
    pub fn new(config: &MarketConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            repository_url: config.repository_url.trim_end_matches('/').to_string(),
            keyword: config.search_keyword.clone(),
            version_rows: config.version_rows,
        })
    }

    async fn search(&self, params: &[(&str, String)]) -> AppResult<SearchResponse> {
        debug!(url = %self.search_url, ?params, "Querying Maven search");

        let url = Url::parse_with_params(&self.search_url, params).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid search URL", e)
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "Search request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Search endpoint returned {status}"
            )));
        }

        response.json::<SearchResponse>().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed search response", e)
        })
    }
}

#[async_trait]
impl ArtifactRegistry for MavenRegistry {
    async fn search_catalog(&self, start: u64, rows: u32) -> AppResult<CatalogPage> {
        let response = self
            .search(&[
                ("q", self.keyword.clone()),
                ("rows", rows.to_string()),
                ("start", start.to_string()),
                ("wt", "json".to_string()),
            ])
            .await?;

        Ok(CatalogPage {
            num_found: response.response.num_found,
            entries: response
                .response
                .docs
                .into_iter()
                .map(|doc| doc.into_catalog_entry())
                .collect(),
        })
    }

    async fn list_versions(&self, group_id: &str, artifact_id: &str) -> AppResult<Vec<String>> {
        let response = self
            .search(&[
                ("q", format!("g:\"{group_id}\" AND a:\"{artifact_id}\"")),
                ("core", "gav".to_string()),
                ("rows", self.version_rows.to_string()),
                ("wt", "json".to_string()),
            ])
            .await?;

        Ok(versions_newest_first(response.response.docs))
    }

    fn download_url(&self, coordinates: &Coordinates) -> String {
        format!("{}/{}", self.repository_url, coordinates.repository_path())
    }

    async fn download(&self, coordinates: &Coordinates, dest: &Path) -> AppResult<u64> {
        coordinates.validate()?;
        let url = self.download_url(coordinates);
        info!(%coordinates, %url, dest = %dest.display(), "Downloading artifact");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "Download request failed", e))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(AppError::not_found(format!(
                    "Artifact {coordinates} not found in repository"
                )));
            }
            status => {
                return Err(AppError::external_service(format!(
                    "Repository returned {status} for {coordinates}"
                )));
            }
        }

        let written = save_stream(response.bytes_stream(), dest).await?;
        info!(%coordinates, bytes = written, "Artifact downloaded");
        Ok(written)
    }
}

/// Temporary path used while a download is in flight.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

/// Write a body stream to `dest` through a `.part` file. The part file is
/// removed on failure and renamed into place on success, so `dest` only
/// ever holds a complete artifact.
async fn save_stream<S, B, E>(stream: S, dest: &Path) -> AppResult<u64>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to create download directory", e)
        })?;
    }

    let part = part_path(dest);
    match write_stream(stream, &part).await {
        Ok(written) => {
            tokio::fs::rename(&part, dest).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to finalize download", e)
            })?;
            Ok(written)
        }
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                warn!(path = %part.display(), error = %cleanup, "Failed to remove partial download");
            }
            Err(e)
        }
    }
}

async fn write_stream<S, B, E>(stream: S, path: &Path) -> AppResult<u64>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to create download file", e))?;

    let mut written = 0u64;
    let mut stream = std::pin::pin!(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Download interrupted", e)
        })?;
        let chunk = chunk.as_ref();
        file.write_all(chunk)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to write download", e))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush download", e))?;
    Ok(written)
}
