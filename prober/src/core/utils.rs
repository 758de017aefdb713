//! Small text helpers shared by the commands

use std::time::Duration;

/// Expected prefix of a Gemini API key
pub const KEY_PREFIX: &str = "AIza";
/// Shortest key length that still looks plausible
pub const MIN_KEY_LENGTH: usize = 30;

/// Mask a credential for display, keeping only its edges
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        let head: String = chars.iter().take(6).collect();
        format!("{head}...")
    }
}

/// First `n` characters of `text`
pub fn head(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Last `n` characters of `text`
pub fn tail(text: &str, n: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(n)).collect()
}

/// Cut `text` to `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", head(text, max))
    }
}

/// Result of the offline key format check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFormatReport {
    pub length: usize,
    pub has_prefix: bool,
    pub length_ok: bool,
}

impl KeyFormatReport {
    pub fn looks_valid(&self) -> bool {
        self.has_prefix && self.length_ok
    }
}

pub fn check_key_format(key: &str) -> KeyFormatReport {
    let length = key.chars().count();
    KeyFormatReport {
        length,
        has_prefix: key.starts_with(KEY_PREFIX),
        length_ok: length >= MIN_KEY_LENGTH,
    }
}

/// `850ms` below one second, `2.3s` above
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    if seconds < 1.0 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{seconds:.1}s")
    }
}

/// Remove a surrounding Markdown code fence from model output
pub fn strip_code_fence(text: &str) -> String {
    if !text.starts_with("```") {
        return text.to_string();
    }
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 2 {
        return String::new();
    }
    lines[1..lines.len() - 1].join("\n")
}

/// Likely causes suggested by an endpoint error message
pub fn error_hints(message: &str) -> Vec<&'static str> {
    let message = message.to_lowercase();
    if message.contains("api key") {
        let mut hints = vec!["🔑 Issue: API key problem"];
        if message.contains("not valid") {
            hints.push("   → Key format is invalid");
        } else if message.contains("permission") {
            hints.push("   → Key lacks permissions");
        }
        hints
    } else if message.contains("quota") || message.contains("rate") {
        vec!["⏱️  Issue: Rate limiting (but this might be misleading)"]
    } else if message.contains("billing") {
        vec!["💳 Issue: Billing not enabled"]
    } else if message.contains("project") {
        vec!["🏗️  Issue: Project configuration"]
    } else {
        Vec::new()
    }
}

/// Parse space-separated 1-based menu numbers into indices below `len`
///
/// Out-of-range numbers are skipped; `None` means the input was not numeric.
pub fn parse_selection(input: &str, len: usize) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    for token in input.split_whitespace() {
        let number: usize = token.parse().ok()?;
        if (1..=len).contains(&number) {
            indices.push(number - 1);
        }
    }
    Some(indices)
}
