//! Log Redaction Layer
//!
//! Scrubs Google AI API keys from strings prior to logging. The Gemini
//! endpoint carries the key as a `key=` query parameter, so transport
//! errors that embed a URL would otherwise leak it.

use regex::Regex;
use std::sync::LazyLock;

static GOOGLE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AIza[0-9A-Za-z_\-]{10,}").unwrap());
static KEY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([?&]key=)[^&\s]+").unwrap());

/// Redacts API keys in a string.
pub fn redact_api_keys(input: &str) -> String {
    let mut redacted = input.to_string();

    // Redact bare Google AI keys
    redacted = GOOGLE_KEY_RE
        .replace_all(&redacted, "[REDACTED_KEY]")
        .to_string();

    // Redact key= query parameters regardless of key shape
    redacted = KEY_PARAM_RE
        .replace_all(&redacted, "${1}[REDACTED]")
        .to_string();

    redacted
}
