//! Tests for response classification in the Gemini client

use reqwest::StatusCode;
use shared::{FinishReason, ProbeFailure};

use crate::services::gemini_client::{classify_status, parse_generation, RealGeminiClient};

#[test]
fn test_endpoint_shape() {
    let client = RealGeminiClient::with_base_url("http://localhost:9000/v1beta/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:9000/v1beta");
    assert_eq!(
        client.endpoint("gemini-2.5-flash"),
        "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
    );
}

#[test]
fn test_classify_status_codes() {
    let body = r#"{"error": {"code": 403, "message": "Permission denied on resource"}}"#;

    assert!(matches!(
        classify_status(StatusCode::BAD_REQUEST, body),
        ProbeFailure::InvalidKey { status: 400, .. }
    ));
    assert!(matches!(
        classify_status(StatusCode::UNAUTHORIZED, body),
        ProbeFailure::InvalidKey { status: 401, .. }
    ));
    assert!(matches!(
        classify_status(StatusCode::FORBIDDEN, body),
        ProbeFailure::PermissionDenied { .. }
    ));
    assert!(matches!(classify_status(StatusCode::NOT_FOUND, body), ProbeFailure::NotFound { .. }));
    assert!(matches!(
        classify_status(StatusCode::TOO_MANY_REQUESTS, body),
        ProbeFailure::RateLimited { .. }
    ));
    assert!(matches!(
        classify_status(StatusCode::INTERNAL_SERVER_ERROR, body),
        ProbeFailure::Http { status: 500, .. }
    ));
}

#[test]
fn test_classify_uses_error_message_or_raw_body() {
    let structured = classify_status(
        StatusCode::FORBIDDEN,
        r#"{"error": {"code": 403, "message": "API key not valid"}}"#,
    );
    assert_eq!(structured.message(), "API key not valid");

    let raw = classify_status(StatusCode::BAD_GATEWAY, "  upstream unavailable \n");
    assert_eq!(raw.message(), "upstream unavailable");
}

#[test]
fn test_parse_stop_with_content_parts() {
    let body = r#"{
        "candidates": [{"content": {"parts": [{"text": "  Hello!  "}]}, "finishReason": "STOP"}],
        "usageMetadata": {"promptTokenCount": 2, "candidatesTokenCount": 3, "totalTokenCount": 5}
    }"#;

    let generation = parse_generation(body).unwrap();
    assert_eq!(generation.text.as_deref(), Some("Hello!"));
    assert_eq!(generation.finish_reason, FinishReason::Stop);
    let usage = generation.usage.unwrap();
    assert_eq!((usage.input_tokens, usage.output_tokens, usage.total_tokens), (2, 3, 5));
}

#[test]
fn test_parse_legacy_parts_shape() {
    let body = r#"{"candidates": [{"parts": [{"text": "legacy"}], "finishReason": "STOP"}]}"#;
    let generation = parse_generation(body).unwrap();
    assert_eq!(generation.text.as_deref(), Some("legacy"));
    assert!(generation.usage.is_none());
}

#[test]
fn test_parse_finish_reasons() {
    let truncated = parse_generation(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#).unwrap();
    assert_eq!(truncated.text.as_deref(), Some("Response truncated (hit token limit: MAX_TOKENS)"));
    assert_eq!(truncated.finish_reason, FinishReason::MaxTokens);

    let blocked = parse_generation(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
    assert_eq!(blocked.text.as_deref(), Some("Response blocked by safety filters: SAFETY"));

    let odd = parse_generation(r#"{"candidates": [{"finishReason": "RECITATION"}]}"#).unwrap();
    assert_eq!(odd.text.as_deref(), Some("Unexpected finish reason: RECITATION"));

    let missing = parse_generation(r#"{"candidates": [{"content": {"parts": [{"text": "x"}]}}]}"#).unwrap();
    assert_eq!(missing.text.as_deref(), Some("Unexpected finish reason: UNKNOWN"));
}

#[test]
fn test_parse_stop_without_text() {
    let body = r#"{"candidates": [{"content": {"parts": [{}]}, "finishReason": "STOP"}]}"#;
    assert_eq!(
        parse_generation(body).unwrap().text.as_deref(),
        Some("No text in response content")
    );

    let body = r#"{"candidates": [{"finishReason": "STOP"}]}"#;
    assert_eq!(
        parse_generation(body).unwrap().text.as_deref(),
        Some("No text found (finish reason: STOP)")
    );
}

#[test]
fn test_parse_strips_code_fence() {
    let body = r#"{"candidates": [{"content": {"parts": [{"text": "```markdown\n## [0.2.0]\n```"}]}, "finishReason": "STOP"}]}"#;
    assert_eq!(parse_generation(body).unwrap().text.as_deref(), Some("## [0.2.0]"));
}

#[test]
fn test_parse_no_candidates() {
    for body in [r#"{}"#, r#"{"candidates": []}"#] {
        assert_eq!(
            parse_generation(body).unwrap_err(),
            ProbeFailure::MalformedResponse("No candidates in response".to_string())
        );
    }
}

#[test]
fn test_parse_error_object_in_success_body() {
    let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}}"#;
    match parse_generation(body).unwrap_err() {
        ProbeFailure::ApiError { code, message } => {
            assert_eq!(code, 400);
            assert!(message.starts_with("API key not valid"));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_parse_invalid_json_is_connection_failure() {
    assert!(matches!(parse_generation("<html>oops</html>"), Err(ProbeFailure::Connection(_))));
}
