//! JSON extraction from model output.
//!
//! Vision models rarely return a bare JSON document; the object is
//! usually wrapped in prose or markdown fences. Extraction tries the
//! whole text first, then the span from the first `{` to the last `}`.
//! When both fail the raw text is wrapped in a fallback envelope, so
//! callers always receive a JSON value and never an error.

use serde_json::{Value, json};

/// Marker placed in the fallback envelope when brace-delimited text was
/// present but would not parse.
pub const PARSE_ERROR_NOTE: &str = "Response could not be parsed as JSON";

/// Result of extracting JSON from raw model text.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub json: Value,
    /// False when `json` is the fallback envelope.
    pub parsed: bool,
}

/// Pull a JSON value out of raw model output.
pub fn extract_json(raw: &str) -> Extraction {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Extraction {
            json: value,
            parsed: true,
        };
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Extraction {
                    json: value,
                    parsed: true,
                };
            }
            return Extraction {
                json: json!({
                    "description": raw,
                    "raw_response": raw,
                    "parse_error": PARSE_ERROR_NOTE,
                }),
                parsed: false,
            };
        }
    }

    Extraction {
        json: json!({
            "description": raw,
            "raw_response": raw,
        }),
        parsed: false,
    }
}
