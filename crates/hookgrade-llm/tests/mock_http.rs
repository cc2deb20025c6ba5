//! Mock HTTP server tests for both grading backends.
//!
//! Uses [`wiremock`] to stand up local servers that emulate the Ollama
//! `/api/chat` endpoint and an OpenAI-compatible `/chat/completions`
//! endpoint, exercising the full path from [`HookScorer::score`] through
//! the wire and back to a validated result.
//!
//! Coverage:
//! - Primary: strict JSON request body, success, 500, malformed reply,
//!   wrong shape, timeout
//! - Secondary: bearer auth, fenced reply, 401, 429, missing key makes no
//!   request
//! - Chain: primary down falls through to secondary

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hookgrade_llm::config::LlmProviderConfig;
use hookgrade_llm::error::ProviderError;
use hookgrade_llm::failover::ScorerChain;
use hookgrade_llm::ollama::OllamaProvider;
use hookgrade_llm::openai_compat::OpenAiCompatProvider;
use hookgrade_llm::provider::Provider;
use hookgrade_llm::scorer::{HookScorer, ProviderScorer, ResponseFormat};
use hookgrade_llm::types::{ChatMessage, ChatRequest};
use hookgrade_types::{GradeRequest, GradeResult, Platform, fallback_result};

fn grade_request() -> GradeRequest {
    GradeRequest::new(
        "I was today years old when I found out coffee could taste like this",
        Platform::TikTok,
        "Beverage",
    )
    .unwrap()
}

fn result_with_score(score: i64) -> GradeResult {
    let mut result = fallback_result();
    result.overall_score = score;
    result
}

fn ollama_scorer(server: &MockServer) -> ProviderScorer<OllamaProvider> {
    let provider = OllamaProvider::new(LlmProviderConfig::new("ollama", server.uri()));
    ProviderScorer::new(provider, "llama3.1", ResponseFormat::StrictJson)
}

fn xai_scorer(server: &MockServer, key: Option<&str>) -> ProviderScorer<OpenAiCompatProvider> {
    let config = LlmProviderConfig::new("xai", server.uri())
        .with_api_key_env("HOOKGRADE_MOCK_UNSET_KEY");
    let provider = match key {
        Some(k) => OpenAiCompatProvider::with_api_key(config, k),
        None => OpenAiCompatProvider::new(config),
    };
    ProviderScorer::new(provider, "grok-beta", ResponseFormat::Fenced).with_temperature(0.7)
}

fn ollama_body(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3.1",
        "created_at": "2024-07-22T20:17:51.397Z",
        "message": {"role": "assistant", "content": content},
        "done": true,
        "prompt_eval_count": 420,
        "eval_count": 310
    })
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-hook-001",
        "object": "chat.completion",
        "model": "grok-beta",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 400, "completion_tokens": 320, "total_tokens": 720}
    })
}

// ── Primary (Ollama-style) ─────────────────────────────────────────────

#[tokio::test]
async fn primary_success_strict_json() {
    let server = MockServer::start().await;
    let expected = result_with_score(84);

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.1",
            "stream": false,
            "format": "json"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ollama_body(&serde_json::to_string(&expected).unwrap())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = ollama_scorer(&server).score(&grade_request()).await.unwrap();
    assert_eq!(result, expected);
}

#[tokio::test]
async fn primary_sends_system_and_user_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system"},
                {
                    "role": "user",
                    "content": "Hook: \"I was today years old when I found out coffee could taste like this\"\nPlatform: TikTok\nCategory: Beverage"
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_body(
            &serde_json::to_string(&fallback_result()).unwrap(),
        )))
        .expect(1)
        .mount(&server)
        .await;

    ollama_scorer(&server).score(&grade_request()).await.unwrap();
}

#[tokio::test]
async fn primary_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "model not loaded"})),
        )
        .mount(&server)
        .await;

    let err = ollama_scorer(&server)
        .score(&grade_request())
        .await
        .unwrap_err();
    match err {
        ProviderError::RequestFailed(msg) => {
            assert!(msg.contains("500"), "got: {msg}");
            assert!(msg.contains("model not loaded"), "got: {msg}");
        }
        other => panic!("expected RequestFailed, got: {other}"),
    }
}

#[tokio::test]
async fn primary_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = ollama_scorer(&server)
        .score(&grade_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)), "got: {err}");
}

#[tokio::test]
async fn primary_reply_missing_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ollama_body(r#"{"overallScore": 70}"#)),
        )
        .mount(&server)
        .await;

    let err = ollama_scorer(&server)
        .score(&grade_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)), "got: {err}");
}

#[tokio::test]
async fn primary_reply_wrong_shape() {
    let server = MockServer::start().await;
    let mut short = fallback_result();
    short.dimensions.truncate(4);

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ollama_body(&serde_json::to_string(&short).unwrap())),
        )
        .mount(&server)
        .await;

    let err = ollama_scorer(&server)
        .score(&grade_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidShape(_)), "got: {err}");
}

#[tokio::test]
async fn primary_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ollama_body(
                    &serde_json::to_string(&fallback_result()).unwrap(),
                ))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let scorer = ollama_scorer(&server).with_timeout(Duration::from_millis(100));
    let err = scorer.score(&grade_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Timeout(_)), "got: {err}");
    assert_eq!(err.code(), "timeout");
}

// ── Secondary (OpenAI-compatible) ──────────────────────────────────────

#[tokio::test]
async fn secondary_fenced_reply() {
    let server = MockServer::start().await;
    let expected = result_with_score(58);
    let content = format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(&expected).unwrap()
    );

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer xai-mock-key"))
        .and(body_partial_json(json!({
            "model": "grok-beta",
            "temperature": 0.7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&content)))
        .expect(1)
        .mount(&server)
        .await;

    let result = xai_scorer(&server, Some("xai-mock-key"))
        .score(&grade_request())
        .await
        .unwrap();
    assert_eq!(result, expected);
}

#[tokio::test]
async fn secondary_bare_json_reply() {
    let server = MockServer::start().await;
    let expected = result_with_score(47);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            &serde_json::to_string(&expected).unwrap(),
        )))
        .mount(&server)
        .await;

    let result = xai_scorer(&server, Some("xai-mock-key"))
        .score(&grade_request())
        .await
        .unwrap();
    assert_eq!(result.overall_score, 47);
}

#[tokio::test]
async fn secondary_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = xai_scorer(&server, Some("bad-key"))
        .score(&grade_request())
        .await
        .unwrap_err();
    match err {
        ProviderError::AuthFailed(msg) => assert!(msg.contains("Incorrect API key")),
        other => panic!("expected AuthFailed, got: {other}"),
    }
}

#[tokio::test]
async fn secondary_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "3")
                .set_body_json(json!({"error": "Too many requests"})),
        )
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::with_api_key(
        LlmProviderConfig::new("xai", server.uri()),
        "xai-mock-key",
    );
    let request = ChatRequest::new("grok-beta", vec![ChatMessage::user("Hello")]);
    let err = provider.complete(&request).await.unwrap_err();
    match err {
        ProviderError::RateLimited { retry_after_ms } => assert_eq!(retry_after_ms, 3000),
        other => panic!("expected RateLimited, got: {other}"),
    }
}

#[tokio::test]
async fn secondary_missing_key_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = xai_scorer(&server, None)
        .score(&grade_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NotConfigured(_)), "got: {err}");
}

#[tokio::test]
async fn secondary_custom_headers_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("x-team", "growth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            &serde_json::to_string(&fallback_result()).unwrap(),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = LlmProviderConfig::new("xai", server.uri()).with_header("x-team", "growth");
    let scorer = ProviderScorer::new(
        OpenAiCompatProvider::with_api_key(config, "xai-mock-key"),
        "grok-beta",
        ResponseFormat::Fenced,
    );
    scorer.score(&grade_request()).await.unwrap();
}

// ── Chain ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn chain_falls_through_to_secondary() {
    let local = MockServer::start().await;
    let hosted = MockServer::start().await;
    let expected = result_with_score(66);

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&local)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            &serde_json::to_string(&expected).unwrap(),
        )))
        .expect(1)
        .mount(&hosted)
        .await;

    let chain = ScorerChain::new(vec![
        Arc::new(ollama_scorer(&local)),
        Arc::new(xai_scorer(&hosted, Some("xai-mock-key"))),
    ]);
    let scored = chain.first_success(&grade_request()).await.unwrap();
    assert_eq!(scored.scorer, "xai");
    assert_eq!(scored.result, expected);
}

#[tokio::test]
async fn chain_primary_success_never_contacts_secondary() {
    let local = MockServer::start().await;
    let hosted = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_body(
            &serde_json::to_string(&fallback_result()).unwrap(),
        )))
        .expect(1)
        .mount(&local)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&hosted)
        .await;

    let chain = ScorerChain::new(vec![
        Arc::new(ollama_scorer(&local)),
        Arc::new(xai_scorer(&hosted, Some("xai-mock-key"))),
    ]);
    let scored = chain.first_success(&grade_request()).await.unwrap();
    assert_eq!(scored.scorer, "ollama");
    assert_eq!(scored.position, 0);
}
