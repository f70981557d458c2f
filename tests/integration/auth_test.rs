//! Integration tests for bearer authentication and permission checks.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use pluginhub_auth::{Claims, JwtEncoder};

use helpers::TestApp;

#[tokio::test]
async fn test_missing_token_is_not_login() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/plugin-marketing/list", Some(json!({})), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], 401);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["msg"], "Not logged in");
}

#[tokio::test]
async fn test_malformed_header_is_not_login() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let response = app
        .request(
            "GET",
            "/api/plugin-marketing/sync",
            None,
            Some(&format!("junk {token}")),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_signature_is_rejected() {
    let app = TestApp::new().await;
    let mut other = app.config.auth.clone();
    other.jwt_secret = "someone-else".to_string();
    let (token, _) = JwtEncoder::new(&other)
        .issue(1, "intruder", &["*".to_string()])
        .expect("issue");

    let response = app
        .request("GET", "/api/plugin-marketing/sync", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], 401);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    let issued = Utc::now() - Duration::hours(2);
    let claims = Claims {
        sub: 1,
        username: "late".to_string(),
        permissions: vec!["*".to_string()],
        iat: issued.timestamp(),
        exp: (issued + Duration::hours(1)).timestamp(),
        jti: Uuid::new_v4(),
    };
    let token = JwtEncoder::new(&app.config.auth)
        .encode_claims(&claims)
        .expect("encode");

    let response = app
        .request("POST", "/api/plugin-marketing/list", Some(json!({})), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_listing_needs_no_permission() {
    let app = TestApp::new().await;
    let token = app.token(&[]);

    let response = app
        .request("POST", "/api/plugin-marketing/list", Some(json!({})), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["total"], 0);
}

#[tokio::test]
async fn test_missing_permission_is_forbidden() {
    let app = TestApp::new().await;
    let token = app.token(&["settings:plugin:download"]);

    let checks = [
        ("GET", "/api/plugin-marketing/sync", None),
        ("POST", "/api/plugin-marketing/install", Some(json!({"id": 1}))),
        ("DELETE", "/api/plugin-marketing/uninstall?id=1", None),
        ("DELETE", "/api/plugin-marketing/delete?id=1", None),
    ];

    for (method, path, body) in checks {
        let response = app.request(method, path, body, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{method} {path}");
        assert_eq!(response.body["code"], 403);
        assert_eq!(response.body["msg"], "No permission");
    }
}

#[tokio::test]
async fn test_permission_is_checked_before_parameters() {
    let app = TestApp::new().await;
    let token = app.token(&[]);

    let checks = [
        ("POST", "/api/plugin-marketing/download", Some(json!({"nope": 1}))),
        ("POST", "/api/plugin-marketing/install", Some(json!({"id": 0}))),
        ("DELETE", "/api/plugin-marketing/uninstall?id=abc", None),
        ("DELETE", "/api/plugin-marketing/delete", None),
    ];

    for (method, path, body) in checks {
        let response = app.request(method, path, body, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{method} {path}");
        assert_eq!(response.body["msg"], "No permission");
    }
}

#[tokio::test]
async fn test_missing_token_wins_over_bad_parameters() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/plugin-marketing/download",
            Some(json!({"nope": 1})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_granted_permission_reaches_service() {
    let app = TestApp::new().await;
    let token = app.token(&["settings:plugin:download"]);

    let response = app
        .request(
            "POST",
            "/api/plugin-marketing/download",
            Some(json!({"id": 1})),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["msg"], "Download Failed");
}

#[tokio::test]
async fn test_wildcard_grants_sync() {
    let app = TestApp::new().await;
    app.mount_catalog(&[("flink-sql-connector-kafka", "3.2.0")])
        .await;
    let token = app.token(&["*"]);

    let response = app
        .request("GET", "/api/plugin-marketing/sync", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["code"], 0);
    assert_eq!(response.body["msg"], "Sync Success");
}
