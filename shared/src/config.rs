//! Key-value configuration file loading and saving
//!
//! The configuration file is a lenient `.env`-style document:
//!
//! ```text
//! # comment
//! GEMINI_KEY="AIza..."
//! LONG_VALUE=first-half
//! second-half
//! ```
//!
//! Lines without an `=` continue the value of the most recent key, so values
//! pasted across several lines are joined back together. The loaded map is
//! handed to every consumer explicitly; nothing is mirrored into the process
//! environment.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::{ConfigError, ConfigResult};

const COMMENT_MARKER: char = '#';
const SEPARATOR: char = '=';
const QUOTE_CHARS: [char; 2] = ['"', '\''];

/// In-memory view of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: BTreeMap<String, String>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file, returning an empty map when it does not exist
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using empty map");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content);
        tracing::debug!(path = %path.display(), keys = config.len(), "config file loaded");
        Ok(config)
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Self {
        let mut config = Self::new();
        let mut pending: Option<(String, Vec<String>)> = None;

        for raw_line in content.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }

            match line.split_once(SEPARATOR) {
                Some((key, value)) => {
                    if let Some((key, parts)) = pending.take() {
                        config.insert(key, join_value(&parts));
                    }
                    let key = key.trim();
                    if key.is_empty() {
                        continue;
                    }
                    pending = Some((key.to_string(), vec![clean_fragment(value)]));
                }
                None => {
                    if let Some((_, parts)) = pending.as_mut() {
                        parts.push(clean_fragment(line));
                    }
                }
            }
        }

        if let Some((key, parts)) = pending {
            config.insert(key, join_value(&parts));
        }

        config
    }

    /// Overwrite `path` with one `KEY=VALUE` line per entry
    pub fn save(&self, path: impl AsRef<Path>, header: Option<&str>) -> ConfigResult<()> {
        let path = path.as_ref();
        fs::write(path, self.render(header)).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), keys = self.len(), "config file written");
        Ok(())
    }

    /// Serialize entries in file format
    pub fn render(&self, header: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(header) = header {
            out.push(COMMENT_MARKER);
            out.push(' ');
            out.push_str(header);
            out.push('\n');
        }
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push(SEPARATOR);
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Lookup that treats blank values as absent
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Copy of this map with a single key replaced
    pub fn merged_with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut merged = self.clone();
        merged.insert(key, value);
        merged
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.insert(key, value);
        }
        config
    }
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches(&QUOTE_CHARS[..])
}

fn clean_fragment(fragment: &str) -> String {
    strip_quotes(fragment.trim()).trim().to_string()
}

fn join_value(parts: &[String]) -> String {
    strip_quotes(&parts.concat()).trim().to_string()
}
