//! Key redaction for log output
//!
//! Provider error bodies and transport errors can echo request headers or
//! keys back; everything logged from this crate passes through [`redact`].

use std::sync::OnceLock;

use regex::Regex;

/// Redaction filter for removing sensitive information from strings
pub struct RedactionFilter {
    patterns: Vec<RedactionPattern>,
}

struct RedactionPattern {
    regex: Regex,
    replacement: String,
}

impl RedactionFilter {
    /// Create a new redaction filter with default patterns
    pub fn new() -> Self {
        let defaults = [
            // Project-scoped and legacy OpenAI keys
            (r"sk-[A-Za-z0-9_\-]{20,}", "[REDACTED_OPENAI_KEY]"),
            (r"(?i)bearer\s+[A-Za-z0-9._\-/+=]+", "Bearer [REDACTED]"),
            (r"(?i)authorization:\s*[^\s,;]+", "Authorization: [REDACTED]"),
            (r"(?i)([A-Z0-9_]*_API_KEY)\s*=\s*[^\s,;]+", "$1=[REDACTED]"),
            (r"(?i)(api[_-]?key|token|secret|password)\s*=\s*[^\s,;]+", "$1=[REDACTED]"),
        ];

        Self {
            patterns: defaults
                .iter()
                .map(|(pattern, replacement)| RedactionPattern {
                    regex: Regex::new(pattern).expect("static redaction pattern"),
                    replacement: replacement.to_string(),
                })
                .collect(),
        }
    }

    /// Redact sensitive information from a string
    pub fn redact(&self, input: &str) -> String {
        let mut result = input.to_string();
        for pattern in &self.patterns {
            result = pattern
                .regex
                .replace_all(&result, pattern.replacement.as_str())
                .to_string();
        }
        result
    }
}

impl Default for RedactionFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn global_filter() -> &'static RedactionFilter {
    static FILTER: OnceLock<RedactionFilter> = OnceLock::new();
    FILTER.get_or_init(RedactionFilter::new)
}

/// Redact sensitive information from a string using the global filter
pub fn redact(input: &str) -> String {
    global_filter().redact(input)
}

