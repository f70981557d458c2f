//! Integration tests for the plugin marketplace endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::{GROUP, TestApp};

const KAFKA: &str = "flink-sql-connector-kafka";
const HIVE: &str = "flink-sql-connector-hive";
const JDBC: &str = "flink-sql-connector-jdbc";

async fn synced_app() -> TestApp {
    let app = TestApp::new().await;
    app.mount_catalog(&[(KAFKA, "3.2.0"), (HIVE, "1.17.2"), (JDBC, "3.1.2")])
        .await;
    app.sync().await;
    app
}

#[tokio::test]
async fn test_sync_pages_through_catalog() {
    let app = synced_app().await;
    let token = app.admin_token();

    let response = app
        .request("POST", "/api/plugin-marketing/list", Some(json!({})), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["total"], 3);
    assert_eq!(response.body["current"], 1);
    assert_eq!(response.body["pageSize"], 10);

    let kafka = app.plugin(KAFKA).await;
    assert_eq!(kafka["pluginId"], format!("{GROUP}:{KAFKA}"));
    assert_eq!(kafka["latestVersion"], "3.2.0");
    assert_eq!(kafka["currentVersion"], "3.2.0");
    assert_eq!(kafka["downloaded"], false);
    assert_eq!(kafka["installed"], false);
}

#[tokio::test]
async fn test_resync_keeps_rows_unique() {
    let app = synced_app().await;
    app.sync().await;

    let token = app.admin_token();
    let response = app
        .request("POST", "/api/plugin-marketing/list", Some(json!({})), Some(&token))
        .await;
    assert_eq!(response.body["total"], 3);
}

#[tokio::test]
async fn test_sync_failure_is_reported_in_envelope() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let response = app
        .request("GET", "/api/plugin-marketing/sync", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["code"], 1);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["msg"], "Sync Failed");
}

#[tokio::test]
async fn test_list_paging_filter_and_sort() {
    let app = synced_app().await;
    let token = app.admin_token();

    let response = app
        .request(
            "POST",
            "/api/plugin-marketing/list",
            Some(json!({"current": 2, "pageSize": 2, "sorter": {"artifactId": "ascend"}})),
            Some(&token),
        )
        .await;
    let rows = response.body["data"].as_array().expect("rows");
    assert_eq!(response.body["total"], 3);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["artifactId"], KAFKA);

    let response = app
        .request(
            "POST",
            "/api/plugin-marketing/list",
            Some(json!({"name": "HIVE", "installed": false})),
            Some(&token),
        )
        .await;
    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["data"][0]["artifactId"], HIVE);
}

#[tokio::test]
async fn test_list_page_past_the_end_is_empty() {
    let app = synced_app().await;
    let token = app.admin_token();

    let response = app
        .request(
            "POST",
            "/api/plugin-marketing/list",
            Some(json!({"current": u64::MAX, "pageSize": 100_000})),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["total"], 3);
    assert_eq!(response.body["current"], u64::MAX);
    assert_eq!(response.body["pageSize"], 100);
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_versions_are_cached() {
    let app = synced_app().await;
    app.mount_versions(KAFKA, &["3.0.0", "3.1.0", "3.2.0"], 1).await;
    let id = app.plugin(KAFKA).await["id"].clone();
    let token = app.admin_token();
    let uri = format!("/api/plugin-marketing/query-all-version-by-plugin-id?id={id}");

    for _ in 0..2 {
        let response = app.request("GET", &uri, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["code"], 0);
        assert_eq!(response.body["data"], json!(["3.2.0", "3.1.0", "3.0.0"]));
    }
}

#[tokio::test]
async fn test_versions_of_unknown_plugin_fail() {
    let app = synced_app().await;
    let token = app.admin_token();

    let response = app
        .request(
            "GET",
            "/api/plugin-marketing/query-all-version-by-plugin-id?id=999",
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], false);
    assert!(response.body["data"].is_null());
}

#[tokio::test]
async fn test_download_install_uninstall_delete_lifecycle() {
    let app = synced_app().await;
    app.mount_artifact(KAFKA, "3.1.0", b"PK\x03\x04kafka").await;
    let token = app.admin_token();
    let mut row = app.plugin(KAFKA).await;
    let id = row["id"].clone();
    row["currentVersion"] = json!("3.1.0");

    let response = app
        .request("POST", "/api/plugin-marketing/download", Some(row.clone()), Some(&token))
        .await;
    assert_eq!(response.body["msg"], "Download Success", "{:?}", response.body);

    let jar = format!("{KAFKA}-3.1.0.jar");
    let downloaded = app.download_dir().join(GROUP).join(&jar);
    assert!(downloaded.is_file());
    let plugin = app.plugin(KAFKA).await;
    assert_eq!(plugin["downloaded"], true);
    assert_eq!(plugin["currentVersion"], "3.1.0");
    assert!(plugin["pluginDownloadUrl"].as_str().expect("url").ends_with(&jar));

    let response = app
        .request("POST", "/api/plugin-marketing/install", Some(row), Some(&token))
        .await;
    assert_eq!(response.body["msg"], "Install Success", "{:?}", response.body);
    let installed = app.plugin_dir().join(&jar);
    assert_eq!(std::fs::read(&installed).expect("installed jar"), b"PK\x03\x04kafka");
    assert_eq!(app.plugin(KAFKA).await["installed"], true);

    let response = app
        .request("DELETE", &format!("/api/plugin-marketing/delete?id={id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["msg"], "Delete Failed");
    assert!(downloaded.is_file());

    let response = app
        .request(
            "DELETE",
            &format!("/api/plugin-marketing/uninstall?id={id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.body["msg"], "Uninstall Success");
    assert!(!installed.exists());

    let response = app
        .request(
            "DELETE",
            &format!("/api/plugin-marketing/uninstall?id={id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["msg"], "Uninstall Failed");

    let response = app
        .request("DELETE", &format!("/api/plugin-marketing/delete?id={id}"), None, Some(&token))
        .await;
    assert_eq!(response.body["msg"], "Delete Success");
    assert!(!downloaded.exists());

    let plugin = app.plugin(KAFKA).await;
    assert_eq!(plugin["downloaded"], false);
    assert_eq!(plugin["installed"], false);
}

#[tokio::test]
async fn test_install_downloads_missing_artifact() {
    let app = synced_app().await;
    app.mount_artifact(JDBC, "3.1.2", b"jdbc").await;
    let token = app.admin_token();
    let id = app.plugin(JDBC).await["id"].clone();

    let response = app
        .request(
            "POST",
            "/api/plugin-marketing/install",
            Some(json!({"id": id})),
            Some(&token),
        )
        .await;

    assert_eq!(response.body["msg"], "Install Success", "{:?}", response.body);
    assert!(app.plugin_dir().join(format!("{JDBC}-3.1.2.jar")).is_file());
    let plugin = app.plugin(JDBC).await;
    assert_eq!(plugin["downloaded"], true);
    assert_eq!(plugin["installed"], true);
}

#[tokio::test]
async fn test_missing_artifact_fails_download() {
    let app = synced_app().await;
    let token = app.admin_token();
    let id = app.plugin(HIVE).await["id"].clone();

    let response = app
        .request(
            "POST",
            "/api/plugin-marketing/download",
            Some(json!({"id": id, "currentVersion": "0.0.1"})),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["code"], 1);
    assert_eq!(response.body["msg"], "Download Failed");
    assert_eq!(app.plugin(HIVE).await["downloaded"], false);
}

#[tokio::test]
async fn test_delete_without_download_is_idempotent() {
    let app = synced_app().await;
    let token = app.admin_token();
    let id = app.plugin(HIVE).await["id"].clone();

    let response = app
        .request("DELETE", &format!("/api/plugin-marketing/delete?id={id}"), None, Some(&token))
        .await;

    assert_eq!(response.body["msg"], "Delete Success");
    assert_eq!(app.plugin(HIVE).await["pluginId"], format!("{GROUP}:{HIVE}"));
}

#[tokio::test]
async fn test_malformed_parameters_are_rejected() {
    let app = synced_app().await;
    let token = app.admin_token();

    let response = app
        .request(
            "POST",
            "/api/plugin-marketing/download",
            Some(json!({"id": 0})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);

    let response = app
        .request("DELETE", "/api/plugin-marketing/delete", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "DELETE",
            "/api/plugin-marketing/uninstall?id=abc",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["store"], true);
    assert_eq!(response.body["data"]["storage"], true);
}
