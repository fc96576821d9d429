//! Integration tests for the HTTP judge providers.
//!
//! Uses wiremock for HTTP mocking. Tests cover envelope unwrapping, the single
//! retry on 5xx, timeouts, and format failures.

use std::time::Duration;

use serde_json::json;
use stadtland_core::{JudgeConfig, JudgeProvider, Round, RoundEngine, RoundError};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEMINI_PATH: &str = "/models/gemini-test:generateContent";

fn gemini_config(server: &MockServer) -> JudgeConfig {
    JudgeConfig::default()
        .with_provider(JudgeProvider::Gemini)
        .with_model("gemini-test")
        .with_api_key("test-key")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(500))
        .with_retry_delay(Duration::ZERO)
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

fn test_round() -> Round {
    Round::from_json(
        r#"{"letter": "B", "categories": ["Stadt", "Land"],
            "answers": {"Anna": ["Bonn", "Belgien"], "Ben": ["Bonn", "Brasilien"]}}"#,
    )
    .unwrap()
}

async fn evaluate(config: JudgeConfig) -> Result<Vec<stadtland_core::ScoreRow>, RoundError> {
    let engine = RoundEngine::new(config.build_oracle().expect("oracle"));
    engine.evaluate(test_round()).await
}

#[tokio::test]
async fn gemini_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
            r#"{"Anna": {"Stadt": true, "Land": true}, "Ben": {"Stadt": true, "Land": false}}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let table = evaluate(gemini_config(&server)).await.unwrap();
    assert_eq!(table[0].scores, vec![5, 20]);
    assert_eq!(table[1].scores, vec![5, 0]);
}

#[tokio::test]
async fn gemini_retries_once_after_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
            r#"{"Anna": {"Stadt": true, "Land": true}, "Ben": {"Stadt": false, "Land": true}}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let table = evaluate(gemini_config(&server)).await.unwrap();
    assert_eq!(table[0].scores, vec![20, 20]);
    assert_eq!(table[1].scores, vec![0, 20]);
}

#[tokio::test]
async fn gemini_two_server_errors_are_external_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let err = evaluate(gemini_config(&server)).await.unwrap_err();
    match err {
        RoundError::ExternalService { attempts, message } => {
            assert_eq!(attempts, 2);
            assert!(message.contains("HTTP 500"), "{message}");
        }
        other => panic!("expected ExternalService, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_timeouts_are_external_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply("{}"))
                .set_delay(Duration::from_secs(5)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = gemini_config(&server).with_timeout(Duration::from_millis(100));
    let err = evaluate(config).await.unwrap_err();
    match err {
        RoundError::ExternalService { attempts, message } => {
            assert_eq!(attempts, 2);
            assert!(message.contains("timed out after 100ms"), "{message}");
        }
        other => panic!("expected ExternalService, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_list_payload_is_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply(r#"[{"Anna": {"Stadt": true}}]"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = evaluate(gemini_config(&server)).await.unwrap_err();
    assert!(matches!(err, RoundError::ResponseFormat { .. }), "{err:?}");
}

#[tokio::test]
async fn gemini_envelope_without_text_is_response_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let err = evaluate(gemini_config(&server)).await.unwrap_err();
    assert!(matches!(err, RoundError::ResponseFormat { .. }), "{err:?}");
}

#[tokio::test]
async fn openai_success_with_fenced_content() {
    let server = MockServer::start().await;
    let content = "```json\n{\"anna\": {\"stadt\": true, \"land\": true}, \"ben\": {\"stadt\": true, \"land\": true}}\n```";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = JudgeConfig::default()
        .with_provider(JudgeProvider::OpenAi)
        .with_model("gpt-test")
        .with_api_key("sk-test")
        .with_base_url(server.uri())
        .with_retry_delay(Duration::ZERO);
    let table = evaluate(config).await.unwrap();
    assert_eq!(table[0].scores, vec![5, 20]);
    assert_eq!(table[1].scores, vec![5, 20]);
}

#[tokio::test]
async fn unreachable_judge_is_external_service_error() {
    // Bind and drop a listener to get a port nobody serves.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = JudgeConfig::default()
        .with_provider(JudgeProvider::Gemini)
        .with_api_key("test-key")
        .with_base_url(format!("http://127.0.0.1:{}", port))
        .with_retry_delay(Duration::ZERO);

    let err = evaluate(config).await.unwrap_err();
    assert!(matches!(err, RoundError::ExternalService { attempts: 2, .. }), "{err:?}");
}
