//! Functional tests for the HTTP generation client against a mock provider

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mockup_generator::backend::{GenerationClient, HttpGenerationClient};
use mockup_generator::config::GenerationConfig;
use mockup_generator::error::AppError;

fn client_for(server: &MockServer, timeout_ms: u64) -> HttpGenerationClient {
    let config = GenerationConfig {
        api_url: format!("{}/v1/images/generations", server.uri()),
        api_key: "sk-test".to_string(),
        timeout_ms,
        ..GenerationConfig::default()
    };
    HttpGenerationClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_generate_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-image-1-mini",
            "n": 1,
            "size": "1024x1536",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"b64_json": "aGVsbG8=", "revised_prompt": "a nicer prompt"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let image = client_for(&server, 5000)
        .generate("a bakery website", "1024x1536")
        .await
        .unwrap();

    assert_eq!(image.b64_json, "aGVsbG8=");
    assert_eq!(image.revised_prompt.as_deref(), Some("a nicer prompt"));
}

#[tokio::test]
async fn test_non_success_status_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client_for(&server, 5000)
        .generate("prompt", "1024x1536")
        .await
        .unwrap_err();

    match err {
        AppError::Provider(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_payload_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": "http://x"}]})))
        .mount(&server)
        .await;

    let result = client_for(&server, 5000).generate("prompt", "1024x1536").await;
    assert!(matches!(result, Err(AppError::Provider(_))));
}

#[tokio::test]
async fn test_empty_data_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let result = client_for(&server, 5000).generate("prompt", "1024x1536").await;
    assert!(matches!(result, Err(AppError::Provider(_))));
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_millis(500))
                .set_body_json(json!({"data": [{"b64_json": "aGVsbG8="}]})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server, 50).generate("prompt", "1024x1536").await;
    assert!(matches!(result, Err(AppError::Timeout(_))));
}

#[tokio::test]
async fn test_unreachable_provider_is_provider_error() {
    let server = MockServer::start().await;
    let client = client_for(&server, 5000);
    drop(server);

    let result = client.generate("prompt", "1024x1536").await;
    assert!(matches!(result, Err(AppError::Provider(_))));
}
