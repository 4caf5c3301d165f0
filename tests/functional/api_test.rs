//! Functional tests for the HTTP API

mod common;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use common::{wait_for_terminal, FakeGenerator, FakeNotifier, Harness};
use mockup_generator::{api::routes::create_router, config::Settings, AppState};

fn app(harness: &Harness) -> Router {
    let mut settings = Settings::default();
    settings.storage.base_path = harness.storage_dir.path().to_string_lossy().to_string();
    let state = Arc::new(AppState::new(Arc::new(settings), harness.orchestrator.clone()));
    create_router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn bakery_body() -> Value {
    json!({"keyword": "bakery shop", "industry": "bakery", "email": "a@b.com"})
}

#[tokio::test]
async fn test_generate_returns_processing_and_task_is_pollable() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));
    let app = app(&harness);

    let response = app.clone().oneshot(post_json("/generate", bakery_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = json_body(response).await;
    assert_eq!(body["status"], "processing");
    assert!(body["created_at"].is_string());
    let task_id = body["task_id"].as_str().unwrap().to_string();

    // Registered before the response was produced
    let response = app.clone().oneshot(get(&format!("/task/{}", task_id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let id = Uuid::parse_str(&task_id).unwrap();
    wait_for_terminal(&harness.registry, &id).await;

    let response = app.oneshot(get(&format!("/task/{}", task_id))).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["email_sent"], true);
    assert!(body["image_url"].as_str().unwrap().ends_with(".png"));
    assert!(body["completed_at"].is_string());
}

#[tokio::test]
async fn test_generated_image_is_served() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));
    let app = app(&harness);

    let response = app.clone().oneshot(post_json("/generate", bakery_body())).await.unwrap();
    let task_id = json_body(response).await["task_id"].as_str().unwrap().to_string();
    let task = wait_for_terminal(&harness.registry, &Uuid::parse_str(&task_id).unwrap()).await;

    let filename = task.image_url.unwrap().rsplit('/').next().unwrap().to_string();
    let response = app.oneshot(get(&format!("/mockups/{}", filename))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_v1_alias() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));
    let app = app(&harness);

    let response = app
        .oneshot(post_json("/api/v1/generate-mockup", bakery_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));

    let response = app(&harness)
        .oneshot(post_json(
            "/generate",
            json!({"keyword": "bakery shop", "industry": "bakery", "email": "nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert!(harness.registry.is_empty());
}

#[tokio::test]
async fn test_blank_keyword_rejected() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));

    let response = app(&harness)
        .oneshot(post_json(
            "/generate",
            json!({"keyword": "     ", "industry": "bakery", "email": "a@b.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(harness.registry.is_empty());
}

#[tokio::test]
async fn test_unknown_industry_rejected() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));

    let response = app(&harness)
        .oneshot(post_json(
            "/generate",
            json!({"keyword": "bakery shop", "industry": "space_mining", "email": "a@b.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(harness.registry.is_empty());
}

#[tokio::test]
async fn test_unknown_task_not_found() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));
    let app = app(&harness);

    let response = app
        .clone()
        .oneshot(get(&format!("/task/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/task/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));

    for uri in ["/health", "/api/v1/health"] {
        let response = app(&harness).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }
}

#[tokio::test]
async fn test_root_points_at_docs() {
    let harness = Harness::new(FakeGenerator::ok(), FakeNotifier::new(true));

    let response = app(&harness).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["docs"], "/api/docs");

    let response = app(&harness).oneshot(get("/api/docs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let endpoints = json_body(response).await["endpoints"].as_array().unwrap().len();
    assert_eq!(endpoints, 3);
}
