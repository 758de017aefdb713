//! Gemini `generateContent` client
//!
//! One POST per call, no retries. The outcome is classified into either a
//! [`Generation`] or a [`ProbeFailure`]; nothing escapes as a panic or error.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use shared::{ConfigMap, FinishReason, ProbeFailure, TokenUsage, DEFAULT_API_BASE, GEMINI_API_BASE};
use crate::core::utils::strip_code_fence;
use crate::error::ProberResult;
use crate::traits::GenerationClient;
use crate::types::{Generation, ProbeProfile};

/// Real client talking to the Generative Language API over HTTPS
#[derive(Clone)]
pub struct RealGeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl RealGeminiClient {
    /// Create a client against the public endpoint
    pub fn new() -> ProberResult<Self> {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Create a client against a custom base URL (e.g. a local mock)
    pub fn with_base_url(base_url: impl Into<String>) -> ProberResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client honouring the optional `GEMINI_API_BASE` override
    pub fn from_config(config: &ConfigMap) -> ProberResult<Self> {
        let base_url = config.get_non_empty(GEMINI_API_BASE).unwrap_or(DEFAULT_API_BASE);
        Self::with_base_url(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint path without the credential query parameter
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerationClient for RealGeminiClient {
    async fn generate(
        &self,
        model: &str,
        credential: &str,
        profile: &ProbeProfile,
    ) -> Result<Generation, ProbeFailure> {
        let request_body = json!({
            "contents": [
                {
                    "parts": [
                        {
                            "text": profile.prompt
                        }
                    ]
                }
            ],
            "generationConfig": profile.generation
        });

        let response = self
            .http
            .post(self.endpoint(model))
            .query(&[("key", credential)])
            .header("Content-Type", "application/json")
            .timeout(profile.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| transport_failure(e, profile))?;

        let status = response.status();
        tracing::debug!(model, profile = profile.name, status = status.as_u16(), "generateContent responded");

        let body = response
            .text()
            .await
            .map_err(|e| transport_failure(e, profile))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        parse_generation(&body)
    }
}

fn transport_failure(error: reqwest::Error, profile: &ProbeProfile) -> ProbeFailure {
    if error.is_timeout() {
        ProbeFailure::Connection(format!("request timed out after {}s", profile.timeout.as_secs_f64()))
    } else {
        // Strip the URL so the credential never ends up in a message
        ProbeFailure::Connection(error.without_url().to_string())
    }
}

/// Map a non-2xx status onto a failure class
pub fn classify_status(status: StatusCode, body: &str) -> ProbeFailure {
    let message = error_message(body);
    match status.as_u16() {
        code @ (400 | 401) => ProbeFailure::InvalidKey { status: code, message },
        403 => ProbeFailure::PermissionDenied { message },
        404 => ProbeFailure::NotFound { message },
        429 => ProbeFailure::RateLimited { message },
        code => ProbeFailure::Http { status: code, message },
    }
}

/// Message from an `{"error": {...}}` body, or the raw body otherwise
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Interpret a 2xx body
pub fn parse_generation(body: &str) -> Result<Generation, ProbeFailure> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ProbeFailure::Connection(format!("invalid JSON in response: {e}")))?;

    if let Some(error) = response.error {
        return Err(ProbeFailure::ApiError {
            code: error.code.unwrap_or_default(),
            message: error.message.unwrap_or_default(),
        });
    }

    let candidate = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or_else(|| ProbeFailure::MalformedResponse("No candidates in response".to_string()))?;

    let usage = response.usage_metadata.map(|usage| {
        let input_tokens = usage.prompt_token_count.unwrap_or(0);
        let output_tokens = usage.candidates_token_count.unwrap_or(0);
        TokenUsage {
            input_tokens,
            output_tokens,
            total_tokens: usage.total_token_count.unwrap_or(input_tokens + output_tokens),
        }
    });

    let finish_reason = FinishReason::parse(candidate.finish_reason.as_deref());
    let text = describe_candidate(&candidate, &finish_reason);

    Ok(Generation {
        text: Some(text),
        finish_reason,
        usage,
    })
}

/// Text shown for a candidate, depending on why generation stopped
fn describe_candidate(candidate: &Candidate, finish_reason: &FinishReason) -> String {
    let text = match finish_reason {
        FinishReason::MaxTokens => format!("Response truncated (hit token limit: {finish_reason})"),
        FinishReason::Safety => format!("Response blocked by safety filters: {finish_reason}"),
        FinishReason::Stop => {
            let nested = candidate.content.as_ref().and_then(|content| content.parts.as_ref());
            match (nested, candidate.parts.as_ref()) {
                (Some(parts), _) if !parts.is_empty() => match &parts[0].text {
                    Some(text) => text.trim().to_string(),
                    None => "No text in response content".to_string(),
                },
                (_, Some(parts)) if !parts.is_empty() => match &parts[0].text {
                    Some(text) => text.trim().to_string(),
                    None => "No text in response parts".to_string(),
                },
                _ => format!("No text found (finish reason: {finish_reason})"),
            }
        }
        FinishReason::Other(_) => format!("Unexpected finish reason: {finish_reason}"),
    };
    strip_code_fence(&text)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    finish_reason: Option<String>,
    content: Option<Content>,
    /// Older response shape with parts directly on the candidate
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
    total_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    message: Option<String>,
}
