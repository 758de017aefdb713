//! Prober-specific data types

use std::time::Duration;
use shared::{FinishReason, GenerationConfig, TokenUsage};

use crate::core::prompt;

/// Prompt, generation parameters and deadline for one kind of probe
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeProfile {
    pub name: &'static str,
    pub prompt: String,
    pub generation: GenerationConfig,
    pub timeout: Duration,
}

impl ProbeProfile {
    pub fn new(name: &'static str, prompt: impl Into<String>, generation: GenerationConfig, timeout: Duration) -> Self {
        Self {
            name,
            prompt: prompt.into(),
            generation,
            timeout,
        }
    }

    /// Cheapest possible call, used to validate credentials
    pub fn key_check() -> Self {
        Self::new("key_check", "Hi", GenerationConfig::new(0.1, 5), Duration::from_secs(10))
    }

    /// Slightly longer call used by the diagnostic command
    pub fn debug() -> Self {
        Self::new("debug", "Hello", GenerationConfig::new(0.1, 10), Duration::from_secs(30))
    }

    /// Validation call that asks for a sentence back, shown to the user
    pub fn key_helper() -> Self {
        Self::new(
            "key_helper",
            prompt::KEY_HELPER_PROMPT,
            GenerationConfig::new(0.1, 20),
            Duration::from_secs(10),
        )
    }

    /// Changelog generation used by the model testing suite
    pub fn changelog() -> Self {
        Self::new(
            "changelog",
            prompt::changelog_prompt(),
            GenerationConfig::new(0.1, 1000),
            Duration::from_secs(60),
        )
    }

    /// Full changelog prompt used by the model comparison
    pub fn comparison() -> Self {
        Self::new(
            "comparison",
            prompt::comparison_prompt(),
            GenerationConfig::new(0.1, 1500).with_sampling(1, 0.8),
            Duration::from_secs(30),
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Successful generation call
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Output text, already interpreted against the finish reason
    pub text: Option<String>,
    pub finish_reason: FinishReason,
    pub usage: Option<TokenUsage>,
}

/// Visual style of a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Plain,
    Title,
    Heading,
    Info,
    Success,
    Warning,
    Error,
    Dim,
    Highlight,
}
