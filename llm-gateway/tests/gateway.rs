//! End-to-end gateway tests against mocked provider APIs.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llm_gateway::{GatewayConfig, GatewayError, LlmGateway, Provider};

fn ollama_gateway(uri: &str) -> LlmGateway {
    let cfg = GatewayConfig::new(Provider::Ollama, uri, "test-model", None).unwrap();
    LlmGateway::new(cfg).unwrap()
}

fn gemini_gateway(uri: &str) -> LlmGateway {
    let cfg = GatewayConfig::new(
        Provider::Gemini,
        uri,
        "gemini-1.5-flash",
        Some("test-key".to_string()),
    )
    .unwrap();
    LlmGateway::new(cfg).unwrap()
}

#[tokio::test]
async fn ollama_generate_returns_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": "hello from ollama"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = ollama_gateway(&server.uri());
    let reply = gateway.generate("say hi").await.unwrap();
    assert_eq!(reply, "hello from ollama");
}

#[tokio::test]
async fn gemini_generate_sends_key_header_and_camel_case_sampling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "temperature": 0.65,
                "topP": 0.85,
                "topK": 30,
                "maxOutputTokens": 1024,
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "first"}, {"text": " second"}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gemini_gateway(&server.uri());
    let reply = gateway.generate("anything").await.unwrap();
    assert_eq!(reply, "first second");
}

#[tokio::test]
async fn non_success_status_maps_to_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model is loading"))
        .mount(&server)
        .await;

    let gateway = ollama_gateway(&server.uri());
    let err = gateway.generate("say hi").await.unwrap_err();
    match err {
        GatewayError::HttpStatus {
            status, snippet, ..
        } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(snippet, "model is loading");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let gateway = ollama_gateway(&server.uri());
    let err = gateway.generate("say hi").await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn empty_completion_maps_to_no_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": ""})))
        .mount(&server)
        .await;

    let gateway = ollama_gateway(&server.uri());
    let err = gateway.generate("say hi").await.unwrap_err();
    assert!(matches!(err, GatewayError::NoCandidates));
}

#[tokio::test]
async fn gemini_without_candidates_maps_to_no_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let gateway = gemini_gateway(&server.uri());
    let err = gateway.generate("anything").await.unwrap_err();
    assert!(matches!(err, GatewayError::NoCandidates));
}

#[tokio::test]
async fn slow_provider_surfaces_as_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "too late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let cfg = GatewayConfig::new(Provider::Ollama, server.uri(), "test-model", None)
        .unwrap()
        .with_timeout(1);
    let gateway = LlmGateway::new(cfg).unwrap();

    let err = gateway.generate("say hi").await.unwrap_err();
    match err {
        GatewayError::Transport(inner) => assert!(inner.is_timeout()),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn health_reports_reachable_ollama_with_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "test-model:latest"}]
        })))
        .mount(&server)
        .await;

    let gateway = ollama_gateway(&server.uri());
    let status = gateway.health().await;
    assert!(status.ok);
    assert_eq!(status.provider, "ollama");
    assert_eq!(status.model, "test-model");
    assert!(status.message.contains("available"));
}

#[tokio::test]
async fn health_reports_failure_without_erroring() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let gateway = ollama_gateway(&server.uri());
    let status = gateway.health().await;
    assert!(!status.ok);
    assert!(status.message.contains("500"));
}
