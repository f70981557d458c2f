//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pluginhub_auth::JwtEncoder;
use pluginhub_core::config::AppConfig;

/// Group id used by every fixture plugin.
pub const GROUP: &str = "org.apache.flink";
/// Search keyword the test catalog answers to.
pub const KEYWORD: &str = "flink-sql-connector";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Fake Maven search API and repository
    pub maven: MockServer,
    /// Application config
    pub config: AppConfig,
    /// Owns the download and plugin directories
    dir: TempDir,
}

impl TestApp {
    /// Create a new test application backed by the in-memory store
    pub async fn new() -> Self {
        let maven = MockServer::start().await;
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.market.search_url = format!("{}/solrsearch/select", maven.uri());
        config.market.repository_url = format!("{}/maven2", maven.uri());
        config.market.search_keyword = KEYWORD.to_string();
        config.market.page_size = 2;
        config.storage.download_dir = dir.path().join("downloads").to_string_lossy().into_owned();
        config.storage.plugin_dir = dir.path().join("plugins").to_string_lossy().into_owned();

        let state = pluginhub_api::build_state(config.clone())
            .await
            .expect("Failed to build state");
        let router = pluginhub_api::build_app(state);

        Self {
            router,
            maven,
            config,
            dir,
        }
    }

    /// Directory downloads land in
    pub fn download_dir(&self) -> PathBuf {
        self.dir.path().join("downloads")
    }

    /// Directory installed plugins are copied to
    pub fn plugin_dir(&self) -> PathBuf {
        self.dir.path().join("plugins")
    }

    /// Issue a token carrying the given permission codes
    pub fn token(&self, permissions: &[&str]) -> String {
        let permissions: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
        JwtEncoder::new(&self.config.auth)
            .issue(7, "tester", &permissions)
            .expect("Failed to issue token")
            .0
    }

    /// Token with the wildcard permission
    pub fn admin_token(&self) -> String {
        self.token(&["*"])
    }

    /// Serve a catalog of artifacts (`artifactId`, `latestVersion`) from
    /// the fake search API, in pages of `market.page_size`.
    pub async fn mount_catalog(&self, artifacts: &[(&str, &str)]) {
        let docs: Vec<Value> = artifacts
            .iter()
            .enumerate()
            .map(|(i, (artifact, version))| {
                json!({
                    "id": format!("{GROUP}:{artifact}"),
                    "g": GROUP,
                    "a": artifact,
                    "latestVersion": version,
                    "repositoryId": "central",
                    "p": "jar",
                    "timestamp": 1_700_000_000_000i64 + i as i64,
                    "versionCount": 3
                })
            })
            .collect();

        let page_size = self.config.market.page_size as usize;
        for (page, chunk) in docs.chunks(page_size).enumerate() {
            Mock::given(method("GET"))
                .and(path("/solrsearch/select"))
                .and(query_param("q", KEYWORD))
                .and(query_param("start", (page * page_size).to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "response": {"numFound": docs.len(), "docs": chunk}
                })))
                .mount(&self.maven)
                .await;
        }
    }

    /// Serve the version list of one artifact, expecting `calls` lookups
    pub async fn mount_versions(&self, artifact: &str, versions: &[&str], calls: u64) {
        let docs: Vec<Value> = versions
            .iter()
            .enumerate()
            .map(|(i, v)| json!({"g": GROUP, "a": artifact, "v": v, "timestamp": i as i64}))
            .collect();

        Mock::given(method("GET"))
            .and(path("/solrsearch/select"))
            .and(query_param("core", "gav"))
            .and(query_param("q", format!("g:\"{GROUP}\" AND a:\"{artifact}\"")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"numFound": docs.len(), "docs": docs}
            })))
            .expect(calls)
            .mount(&self.maven)
            .await;
    }

    /// Serve a jar from the fake repository
    pub async fn mount_artifact(&self, artifact: &str, version: &str, body: &[u8]) {
        Mock::given(method("GET"))
            .and(path(format!(
                "/maven2/org/apache/flink/{artifact}/{version}/{artifact}-{version}.jar"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(&self.maven)
            .await;
    }

    /// Run a catalog sync as admin and assert it succeeded
    pub async fn sync(&self) {
        let token = self.admin_token();
        let response = self
            .request("GET", "/api/plugin-marketing/sync", None, Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["msg"], "Sync Success", "{:?}", response.body);
    }

    /// Find a synced plugin row by artifact id
    pub async fn plugin(&self, artifact: &str) -> Value {
        let token = self.admin_token();
        let response = self
            .request(
                "POST",
                "/api/plugin-marketing/list",
                Some(json!({"artifactId": artifact})),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["data"]
            .as_array()
            .and_then(|rows| rows.iter().find(|r| r["artifactId"] == artifact))
            .cloned()
            .unwrap_or_else(|| panic!("Plugin {artifact} not listed"))
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
