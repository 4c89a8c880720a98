use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;

use adify::config::{GeneratorConfig, ScoringConfig, Settings};
use adify::generator::{build_prompt, GeneratorError};
use adify::{CopyGenerator, CopyModel, GeminiClient, Platform, UserRequest};

const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn settings_for(server: &MockServer) -> Settings {
    Settings::new(
        "test-key",
        GeneratorConfig {
            model: "gemini-2.5-flash".to_string(),
            api_base: server.url("/v1beta"),
        },
        ScoringConfig::default(),
    )
}

fn request() -> UserRequest {
    UserRequest::new("AI Resume Analyzer", "job seekers", Platform::LinkedIn)
}

#[tokio::test]
async fn sends_prompt_with_key_and_joins_candidate_parts() {
    let server = MockServer::start_async().await;
    let prompt = build_prompt("AI Resume Analyzer", "job seekers", Platform::LinkedIn);
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(PATH)
                .header("x-goog-api-key", "test-key")
                .json_body(json!({ "contents": [{ "parts": [{ "text": prompt }] }] }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [{ "text": "1. Try it free.\n" }, { "text": "2. Join now.\n" }]
                        },
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": { "promptTokenCount": 90 }
                }));
        })
        .await;

    let generator = CopyGenerator::from_settings(&settings_for(&server));
    let text = generator.generate(&request()).await;

    mock.assert_async().await;
    assert_eq!(text, "1. Try it free.\n2. Join now.");
}

#[tokio::test]
async fn server_error_downgrades_to_empty_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(500).body("{\"error\":{\"message\":\"internal\"}}");
        })
        .await;

    let generator = CopyGenerator::from_settings(&settings_for(&server));
    let text = generator.generate(&request()).await;

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(text, "");
}

#[tokio::test]
async fn client_reports_status_and_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(403).body("API key not valid");
        })
        .await;

    let client = GeminiClient::new(&settings_for(&server));
    let err = client.generate_content("prompt").await.unwrap_err();

    match err {
        GeneratorError::Api { status, detail } => {
            assert_eq!(status, 403);
            assert_eq!(detail, "API key not valid");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_downgrades_to_empty_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).body("not json");
        })
        .await;

    let client = Arc::new(GeminiClient::new(&settings_for(&server)));
    assert!(matches!(
        client.generate_content("prompt").await,
        Err(GeneratorError::Decode(_))
    ));

    let generator = CopyGenerator::new(client);
    assert_eq!(generator.generate(&request()).await, "");
}

#[tokio::test]
async fn no_candidates_downgrades_to_empty_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        })
        .await;

    let generator = CopyGenerator::from_settings(&settings_for(&server));
    assert_eq!(generator.generate(&request()).await, "");
}

#[tokio::test]
async fn unreachable_host_downgrades_to_empty_text() {
    let settings = Settings::new(
        "test-key",
        GeneratorConfig {
            model: "gemini-2.5-flash".to_string(),
            api_base: "http://127.0.0.1:1/v1beta".to_string(),
        },
        ScoringConfig::default(),
    );

    let generator = CopyGenerator::from_settings(&settings);
    assert_eq!(generator.generate(&request()).await, "");
}
