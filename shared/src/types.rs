//! Core probe types shared by the loader, the runner and the commands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Config key holding the primary credential
pub const GEMINI_KEY: &str = "GEMINI_KEY";
/// Config key holding the default model name
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
/// Config key overriding the endpoint base URL
pub const GEMINI_API_BASE: &str = "GEMINI_API_BASE";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Models offered by the model testing suite
pub const TEST_MODELS: &[&str] = &["gemini-2.5-pro", "gemini-2.5-flash"];

/// Models compared by the changelog comparison run
pub const COMPARISON_MODELS: &[&str] = &["gemini-2.5-pro", "gemini-2.5-flash", "gemini-2.0-flash"];

/// Named credential slots in the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySlot {
    Primary,
    Secondary,
    Fallback,
}

impl KeySlot {
    pub const ALL: [KeySlot; 3] = [KeySlot::Primary, KeySlot::Secondary, KeySlot::Fallback];

    /// Config key the slot is stored under
    pub fn config_key(&self) -> &'static str {
        match self {
            KeySlot::Primary => GEMINI_KEY,
            KeySlot::Secondary => "GEMINI_KEY_SECONDARY",
            KeySlot::Fallback => "GEMINI_KEY_FALLBACK",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            KeySlot::Primary => "KEY 1",
            KeySlot::Secondary => "KEY 2",
            KeySlot::Fallback => "KEY 3",
        }
    }
}

impl fmt::Display for KeySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.config_key())
    }
}

/// Generation parameters sent with every probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    pub fn new(temperature: f64, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            top_k: None,
            top_p: None,
            max_output_tokens,
        }
    }

    pub fn with_sampling(mut self, top_k: u32, top_p: f64) -> Self {
        self.top_k = Some(top_k);
        self.top_p = Some(top_p);
        self
    }
}

/// Token usage reported by the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Why generation stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other(String),
}

impl FinishReason {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("STOP") => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::MaxTokens,
            Some("SAFETY") => FinishReason::Safety,
            Some(other) => FinishReason::Other(other.to_string()),
            None => FinishReason::Other("UNKNOWN".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Other(raw) => raw,
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified reason a probe did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// HTTP 400/401, the credential was rejected outright
    #[error("invalid key (HTTP {status}): {message}")]
    InvalidKey { status: u16, message: String },

    /// HTTP 403, the credential lacks permission
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    /// HTTP 404, unknown model identifier
    #[error("model not found: {message}")]
    NotFound { message: String },

    /// HTTP 429, throttled but the credential may still be valid
    #[error("rate limited, possibly valid: {message}")]
    RateLimited { message: String },

    /// Any other non-2xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose body carries an `error` object
    #[error("API error {code}: {message}")]
    ApiError { code: i64, message: String },

    /// 2xx response without the expected fields
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Transport failure, timeout or undecodable body
    #[error("connection error: {0}")]
    Connection(String),

    /// The probe task itself did not run to completion
    #[error("probe aborted: {0}")]
    Aborted(String),
}

impl ProbeFailure {
    /// Short classification used in summaries
    pub fn label(&self) -> String {
        match self {
            ProbeFailure::InvalidKey { .. } => "invalid key".to_string(),
            ProbeFailure::PermissionDenied { .. } => "denied".to_string(),
            ProbeFailure::NotFound { .. } => "not found".to_string(),
            ProbeFailure::RateLimited { .. } => "rate limited, possibly valid".to_string(),
            ProbeFailure::Http { status, .. } => format!("error {status}"),
            ProbeFailure::ApiError { code, .. } => format!("api error {code}"),
            ProbeFailure::MalformedResponse(_) => "malformed response".to_string(),
            ProbeFailure::Connection(_) => "connection error".to_string(),
            ProbeFailure::Aborted(_) => "aborted".to_string(),
        }
    }

    /// HTTP status behind the failure, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeFailure::InvalidKey { status, .. } | ProbeFailure::Http { status, .. } => Some(*status),
            ProbeFailure::PermissionDenied { .. } => Some(403),
            ProbeFailure::NotFound { .. } => Some(404),
            ProbeFailure::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Endpoint-supplied or transport message
    pub fn message(&self) -> &str {
        match self {
            ProbeFailure::InvalidKey { message, .. }
            | ProbeFailure::PermissionDenied { message }
            | ProbeFailure::NotFound { message }
            | ProbeFailure::RateLimited { message }
            | ProbeFailure::Http { message, .. }
            | ProbeFailure::ApiError { message, .. } => message,
            ProbeFailure::MalformedResponse(message)
            | ProbeFailure::Connection(message)
            | ProbeFailure::Aborted(message) => message,
        }
    }

    /// Rate limits are a soft signal: the key authenticated but was throttled
    pub fn may_be_valid(&self) -> bool {
        matches!(self, ProbeFailure::RateLimited { .. })
    }

    pub fn is_auth_problem(&self) -> bool {
        matches!(self, ProbeFailure::InvalidKey { .. } | ProbeFailure::PermissionDenied { .. })
    }
}

/// One unit of work for the probe runner
#[derive(Clone, PartialEq, Eq)]
pub struct ProbeTask {
    pub id: String,
    pub model: String,
    pub credential: String,
}

impl ProbeTask {
    pub fn new(id: impl Into<String>, model: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            credential: credential.into(),
        }
    }

    /// Task identified by the model it probes
    pub fn for_model(model: &str, credential: &str) -> Self {
        Self::new(model, model, credential)
    }
}

impl fmt::Debug for ProbeTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTask")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Outcome of one probe task
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub task_id: String,
    pub model: String,
    pub success: bool,
    pub text: Option<String>,
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<TokenUsage>,
    pub failure: Option<ProbeFailure>,
    pub elapsed: Duration,
}

impl ProbeResult {
    pub fn succeeded(
        task: &ProbeTask,
        text: Option<String>,
        finish_reason: Option<FinishReason>,
        usage: Option<TokenUsage>,
        elapsed: Duration,
    ) -> Self {
        Self {
            task_id: task.id.clone(),
            model: task.model.clone(),
            success: true,
            text,
            finish_reason,
            usage,
            failure: None,
            elapsed,
        }
    }

    pub fn failed(task: &ProbeTask, failure: ProbeFailure, elapsed: Duration) -> Self {
        Self {
            task_id: task.id.clone(),
            model: task.model.clone(),
            success: false,
            text: None,
            finish_reason: None,
            usage: None,
            failure: Some(failure),
            elapsed,
        }
    }

    /// Classification string for failed results
    pub fn error_label(&self) -> Option<String> {
        self.failure.as_ref().map(ProbeFailure::label)
    }
}
