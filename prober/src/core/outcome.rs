//! Mapping probe results onto the verdicts shown by the key commands

use std::fmt;
use shared::{ProbeFailure, ProbeResult};

/// Verdict for one configured key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Valid,
    ValidRateLimited,
    InvalidKey,
    HttpError(u16),
    NoResponse,
    ConnectionFailed,
    NotConfigured,
}

impl KeyStatus {
    pub fn from_result(result: &ProbeResult) -> Self {
        match &result.failure {
            None => KeyStatus::Valid,
            Some(failure) => Self::from_failure(failure),
        }
    }

    pub fn from_failure(failure: &ProbeFailure) -> Self {
        match failure {
            ProbeFailure::RateLimited { .. } => KeyStatus::ValidRateLimited,
            ProbeFailure::InvalidKey { .. } | ProbeFailure::PermissionDenied { .. } => KeyStatus::InvalidKey,
            ProbeFailure::NotFound { .. } => KeyStatus::HttpError(404),
            ProbeFailure::Http { status, .. } => KeyStatus::HttpError(*status),
            ProbeFailure::ApiError { .. } | ProbeFailure::MalformedResponse(_) => KeyStatus::NoResponse,
            ProbeFailure::Connection(_) | ProbeFailure::Aborted(_) => KeyStatus::ConnectionFailed,
        }
    }

    /// Working keys include throttled ones
    pub fn is_working(&self) -> bool {
        matches!(self, KeyStatus::Valid | KeyStatus::ValidRateLimited)
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStatus::Valid => write!(f, "valid"),
            KeyStatus::ValidRateLimited => write!(f, "valid but rate limited"),
            KeyStatus::InvalidKey => write!(f, "ERR invalid key"),
            KeyStatus::HttpError(code) => write!(f, "ERR {code}"),
            KeyStatus::NoResponse => write!(f, "ERR no response"),
            KeyStatus::ConnectionFailed => write!(f, "ERR connection failed"),
            KeyStatus::NotConfigured => write!(f, "ERR not found"),
        }
    }
}

/// Message shown by the key helper after validating a single key
pub fn helper_message(result: &ProbeResult) -> String {
    match &result.failure {
        None => result.text.clone().unwrap_or_default(),
        Some(ProbeFailure::InvalidKey { status: 400, .. }) => "Invalid API key format".to_string(),
        Some(ProbeFailure::InvalidKey { .. }) | Some(ProbeFailure::PermissionDenied { .. }) => {
            "API key denied - check permissions".to_string()
        }
        Some(ProbeFailure::RateLimited { .. }) => "Rate limited - key might be valid".to_string(),
        Some(ProbeFailure::ApiError { .. }) | Some(ProbeFailure::MalformedResponse(_)) => {
            "No response generated".to_string()
        }
        Some(failure) => match failure.status() {
            Some(status) => format!("HTTP {status} error"),
            None => format!("Connection error: {}", crate::core::utils::truncate(failure.message(), 50)),
        },
    }
}
