//! Response bodies and configuration files used across the suites

use serde_json::{json, Value};

pub struct TestFixtures;

impl TestFixtures {
    pub const PRIMARY_KEY: &'static str = "AIzaSyPrimaryTestKey0123456789abcd";
    pub const SECONDARY_KEY: &'static str = "AIzaSySecondaryTestKey0123456789ab";
    pub const FALLBACK_KEY: &'static str = "AIzaSyFallbackTestKey0123456789abc";

    /// Successful generateContent body with the given text
    pub fn success_body(text: &str) -> Value {
        json!({
            "candidates": [
                {
                    "content": { "parts": [ { "text": text } ], "role": "model" },
                    "finishReason": "STOP",
                    "index": 0
                }
            ],
            "usageMetadata": {
                "promptTokenCount": 9,
                "candidatesTokenCount": 4,
                "totalTokenCount": 13
            }
        })
    }

    pub fn error_body(code: u16, message: &str, status: &str) -> Value {
        json!({
            "error": { "code": code, "message": message, "status": status }
        })
    }

    pub fn invalid_key_body() -> Value {
        Self::error_body(400, "API key not valid. Please pass a valid API key.", "INVALID_ARGUMENT")
    }

    pub fn permission_body() -> Value {
        Self::error_body(403, "Permission denied: Generative Language API has not been used in project", "PERMISSION_DENIED")
    }

    pub fn quota_body() -> Value {
        Self::error_body(429, "Resource has been exhausted (e.g. check quota).", "RESOURCE_EXHAUSTED")
    }

    pub fn not_found_body(model: &str) -> Value {
        Self::error_body(404, &format!("models/{model} is not found for API version v1beta"), "NOT_FOUND")
    }

    /// Config file with all three key slots and a default model
    pub fn full_config() -> String {
        format!(
            "# Gemini API Keys\nGEMINI_KEY=\"{}\"\nGEMINI_KEY_SECONDARY='{}'\nGEMINI_KEY_FALLBACK={}\nGEMINI_MODEL=gemini-2.5-pro\n",
            Self::PRIMARY_KEY,
            Self::SECONDARY_KEY,
            Self::FALLBACK_KEY
        )
    }

    /// Config file with only the primary key
    pub fn primary_only_config() -> String {
        format!("GEMINI_KEY={}\n", Self::PRIMARY_KEY)
    }
}
