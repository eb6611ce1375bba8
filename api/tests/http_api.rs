//! End-to-end tests driving both services over real sockets.
//!
//! Routers are spawned on ephemeral ports with mocked upstreams, then hit
//! with plain reqwest the same way the web client would.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use api::{ChatState, LeafState};
use leaf_model::{ModelConfig, ModelService};
use llm_gateway::{GatewayConfig, LlmGateway, Provider};
use plant_doctor::LeafClassifier;

async fn spawn(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Chat service wired to mocked model and classifier backends.
async fn chat_service() -> (String, MockServer, MockServer) {
    let llm = MockServer::start().await;
    let leaf = MockServer::start().await;

    let cfg = GatewayConfig::new(Provider::Ollama, llm.uri(), "test-model", None).unwrap();
    let gateway = Arc::new(LlmGateway::new(cfg).unwrap());
    let predict_url = format!("{}/predict", leaf.uri());
    let classifier = LeafClassifier::new(predict_url.clone()).unwrap();
    let state = Arc::new(ChatState::new(
        gateway,
        classifier,
        Duration::from_secs(1800),
        predict_url,
    ));

    (spawn(api::chat_router(state)).await, llm, leaf)
}

/// Leaf service wired to a mocked serving runtime.
async fn leaf_service() -> (String, MockServer) {
    let runtime = MockServer::start().await;
    let model = ModelService::new(ModelConfig::new(runtime.uri(), "okra_leaf")).unwrap();
    let state = Arc::new(LeafState::new(model));

    (spawn(api::leaf_router(state)).await, runtime)
}

async fn post_chat(base: &str, form: reqwest::multipart::Form) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn chat_greeting_round_trip() {
    let (base, llm, _leaf) = chat_service().await;

    let form = reqwest::multipart::Form::new().text("message", "hi");
    let (status, body) = post_chat(&base, form).await;

    assert_eq!(status, 200);
    assert_eq!(
        body["response"],
        "👋 Hello! I'm OkraBot, your okra plant assistant. How can I help today?"
    );
    assert!(llm.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn chat_sessions_keep_separate_disease_focus() {
    let (base, llm, _leaf) = chat_service().await;
    // Specific mock first: wiremock picks the first mounted match.
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Context: Possible Downy Mildew"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "mildew advice"})))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("You're OkraBot, an expert in okra plant care"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "generic help"})))
        .mount(&llm)
        .await;

    let form = reqwest::multipart::Form::new()
        .text("message", "white powdery mildew on leaves")
        .text("session", "a");
    let (_, body) = post_chat(&base, form).await;
    assert_eq!(
        body["response"],
        "mildew advice\n\n📚 Learn more: https://example.com/mildew-guide"
    );

    // Same follow-up, two sessions: only session "a" has a disease in focus.
    let form = reqwest::multipart::Form::new()
        .text("message", "how long does it take to worsen")
        .text("session", "a");
    let (_, body) = post_chat(&base, form).await;
    let reply = body["response"].as_str().unwrap();
    assert!(reply.contains("Downy Mildew Progression Timeline"));

    let form = reqwest::multipart::Form::new()
        .text("message", "how long does it take to worsen")
        .text("session", "b");
    let (_, body) = post_chat(&base, form).await;
    assert_eq!(body["response"], "generic help");
}

#[tokio::test]
async fn chat_accepts_leaf_photo_uploads() {
    let (base, _llm, leaf) = chat_service().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"predicted_disease": "Healthy"})),
        )
        .expect(1)
        .mount(&leaf)
        .await;

    let part = reqwest::multipart::Part::bytes(vec![0xFF, 0xD8, 0xFF])
        .file_name("leaf.jpg");
    let form = reqwest::multipart::Form::new().part("image", part);
    let (status, body) = post_chat(&base, form).await;

    assert_eq!(status, 200);
    assert_eq!(body["response"], "✅ Healthy plant detected! No signs of disease found.");
}

#[tokio::test]
async fn chat_without_multipart_body_is_an_empty_message() {
    let (base, llm, _leaf) = chat_service().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("You're OkraBot, a friendly chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hello!"})))
        .expect(1)
        .mount(&llm)
        .await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&json!({"message": "ignored"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["response"], "hello!");
}

#[tokio::test]
async fn chat_malformed_multipart_still_answers_200() {
    let (base, _llm, _leaf) = chat_service().await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
        .body("this is not a multipart payload")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["response"], "An error occurred. Please try again.");
}

#[tokio::test]
async fn predict_formats_the_winning_confidence() {
    let (base, runtime) = leaf_service().await;
    Mock::given(method("POST"))
        .and(path("/v1/models/okra_leaf:predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [[0.01, 0.01, 0.02, 0.01, 0.9327, 0.01, 0.01]]
        })))
        .mount(&runtime)
        .await;

    let part = reqwest::multipart::Part::bytes(vec![1, 2, 3]).file_name("leaf.jpg");
    let form = reqwest::multipart::Form::new().part("image", part);
    let resp = reqwest::Client::new()
        .post(format!("{base}/predict"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["predicted_disease"], "Leaf Curl Virus");
    assert_eq!(body["confidence"], "93.27%");
}

#[tokio::test]
async fn predict_without_image_part_is_rejected() {
    let (base, _runtime) = leaf_service().await;

    let form = reqwest::multipart::Form::new().text("name", "not an image");
    let resp = reqwest::Client::new()
        .post(format!("{base}/predict"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn predict_with_blank_file_input_is_rejected() {
    let (base, _runtime) = leaf_service().await;

    let part = reqwest::multipart::Part::bytes(vec![1, 2, 3]).file_name("");
    let form = reqwest::multipart::Form::new().part("image", part);
    let resp = reqwest::Client::new()
        .post(format!("{base}/predict"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No selected file");
}

#[tokio::test]
async fn predict_surfaces_runtime_failures_as_500() {
    let (base, runtime) = leaf_service().await;
    Mock::given(method("POST"))
        .and(path("/v1/models/okra_leaf:predict"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
        .mount(&runtime)
        .await;

    let part = reqwest::multipart::Part::bytes(vec![1, 2, 3]).file_name("leaf.jpg");
    let form = reqwest::multipart::Form::new().part("image", part);
    let resp = reqwest::Client::new()
        .post(format!("{base}/predict"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Prediction failed:"), "got: {error}");
}

#[tokio::test]
async fn health_endpoints_report_their_upstreams() {
    let (chat_base, llm, _leaf) = chat_service().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "test-model"}]
        })))
        .mount(&llm)
        .await;

    let body: Value = reqwest::get(format!("{chat_base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["service"], "chat-api");
    assert!(body["classifier_url"].as_str().unwrap().ends_with("/predict"));
    assert_eq!(body["targets"][0]["name"], "llm-gateway");
    assert_eq!(body["targets"][0]["ok"], true);

    let (leaf_base, runtime) = leaf_service().await;
    Mock::given(method("GET"))
        .and(path("/v1/models/okra_leaf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_version_status": [{"state": "AVAILABLE"}]
        })))
        .mount(&runtime)
        .await;

    let body: Value = reqwest::get(format!("{leaf_base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["service"], "leaf-api");
    assert_eq!(body["targets"][0]["model"], "okra_leaf");
    assert_eq!(body["targets"][0]["ok"], true);
}
