use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::StatusCode;
use goforge_core::config::Config;
use goforge_core::tool_runner::ScriptedRunner;
use goforge_server::state::AppState;
use http_body_util::BodyExt;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app_with(runner: ScriptedRunner, ui: bool) -> axum::Router {
    goforge_server::build_router(AppState::with_runner(
        Path::new("."),
        Config::default(),
        Arc::new(runner),
        ui,
    ))
}

fn app() -> axum::Router {
    app_with(ScriptedRunner::new(), false)
}

fn write(dir: &TempDir, rel: &str, text: &str) {
    let path = dir.path().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

/// Send a GET request via `oneshot` and return (status, raw body).
async fn get_raw(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get_raw(app, uri).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// Health and config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let (status, json) = get(app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["uptime_secs"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn config_endpoint_returns_effective_config() {
    let (status, json) = get(app(), "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["server"]["web_port"], 8081);
    assert_eq!(json["warnings"], json!([]));
}

// ---------------------------------------------------------------------------
// Test generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_reports_outcomes_and_writes_file() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "shapes.go",
        "package shapes\n\nfunc Area(r float64) float64 { return r * r }\n",
    );
    write(&dir, "helpers.go", "package shapes\n\nfunc clamp() {}\n");

    let (status, json) = post_json(
        app(),
        "/api/test/generate",
        json!({ "path": dir.path(), "table_driven": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Test generation completed");
    let outcomes = json["data"]["report"]["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0]["status"], "skipped");
    assert_eq!(outcomes[1]["status"], "generated");
    assert!(json["data"]["output"]
        .as_str()
        .unwrap()
        .contains("1 generated, 1 skipped, 0 failed"));

    let text = std::fs::read_to_string(dir.path().join("shapes_test.go")).unwrap();
    assert!(text.contains("name: \"test case 2\","));
}

#[tokio::test]
async fn configured_output_dir_is_relative_to_project_root() {
    let project = TempDir::new().unwrap();
    let sources = TempDir::new().unwrap();
    write(
        &sources,
        "shapes.go",
        "package shapes\n\nfunc Area(r float64) float64 { return r * r }\n",
    );
    let mut config = Config::default();
    config.test.output_dir = Some(PathBuf::from("gen"));
    let app = goforge_server::build_router(AppState::with_runner(
        project.path(),
        config,
        Arc::new(ScriptedRunner::new()),
        false,
    ));

    let (status, _) = post_json(app, "/api/test/generate", json!({ "path": sources.path() })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(project.path().join("gen/shapes_test.go").is_file());
    assert!(!sources.path().join("gen").exists());
}

#[tokio::test]
async fn generate_collision_is_reported_not_an_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "parser.go", "package parser\n\nfunc Parse() {}\n");
    write(&dir, "parser_test.go", "package parser\n");

    let (status, json) =
        post_json(app(), "/api/test/generate", json!({ "path": dir.path() })).await;
    assert_eq!(status, StatusCode::OK);
    let outcome = &json["data"]["report"]["outcomes"][0];
    assert_eq!(outcome["status"], "failed");
    assert!(outcome["reason"].as_str().unwrap().starts_with("already exists"));
}

#[tokio::test]
async fn generate_requires_path() {
    let (status, json) = post_json(app(), "/api/test/generate", json!({ "path": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "path is required");

    let (status, _) = post_json(app(), "/api/test/generate", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_missing_root_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_json(
        app(),
        "/api/test/generate",
        json!({ "path": dir.path().join("missing") }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("path not found"));
}

// ---------------------------------------------------------------------------
// Tool-backed operations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dependency_check_parses_go_list() {
    let dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::new().ok(
        "go list -m -u all",
        "example.com/app\ngithub.com/pkg/errors v0.9.0 [v0.9.1]\n",
    );
    let (status, json) = post_json(
        app_with(runner, false),
        "/api/dependency/check",
        json!({ "path": dir.path() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"]["report"]["outdated"][0]["latest"],
        "v0.9.1"
    );
}

#[tokio::test]
async fn security_without_scanner_is_reported() {
    let dir = TempDir::new().unwrap();
    let (status, json) =
        post_json(app(), "/api/dependency/security", json!({ "path": dir.path() })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["report"]["scanner_available"], false);
}

#[tokio::test]
async fn missing_go_toolchain_is_503() {
    let dir = TempDir::new().unwrap();
    let (status, json) =
        post_json(app(), "/api/test/coverage", json!({ "path": dir.path() })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("go"));
}

#[tokio::test]
async fn failing_tool_is_422() {
    let dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::new().fail("go get", 1, "go: no go.mod");
    let (status, json) = post_json(
        app_with(runner, false),
        "/api/dependency/update",
        json!({ "path": dir.path() }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("no go.mod"));
}

#[tokio::test]
async fn profile_requires_binary() {
    let (status, json) = post_json(app(), "/api/profile/cpu", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "binary is required");
}

// ---------------------------------------------------------------------------
// Containers and docs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dockerfile_is_written() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_json(
        app(),
        "/api/container/dockerfile",
        json!({ "path": dir.path(), "base_image": "golang:1.22" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let output = json["data"]["report"]["output"].as_str().unwrap();
    let text = std::fs::read_to_string(output).unwrap();
    assert!(text.starts_with("FROM golang:1.22 AS builder"));
}

#[tokio::test]
async fn docs_rejects_unknown_format_and_type() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_json(
        app(),
        "/api/docs/generate",
        json!({ "path": dir.path(), "format": "pdf" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("unsupported format"));

    let (status, _) = post_json(
        app(),
        "/api/docs/generate",
        json!({ "path": dir.path(), "type": "tutorial" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_docs_are_generated() {
    let dir = TempDir::new().unwrap();
    write(&dir, "go.mod", "module example.com/shop\n");
    let (status, json) = post_json(
        app(),
        "/api/docs/generate",
        json!({ "path": dir.path(), "type": "user", "format": "markdown" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(dir.path().join("user-docs/user-guide.md").is_file());
    assert_eq!(json["data"]["report"]["format"], "markdown");
}

// ---------------------------------------------------------------------------
// Front end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ui_serves_index_for_unknown_paths() {
    let (status, body) = get_raw(app_with(ScriptedRunner::new(), true), "/some/page").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("<title>goforge</title>"));
}

#[tokio::test]
async fn api_only_mode_returns_json_404() {
    let (status, json) = get(app(), "/index.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not found");
}
