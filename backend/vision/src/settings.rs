//! Runtime settings for the vision pipeline, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Placeholder value shipped in sample env files; treated as unset.
pub const PLACEHOLDER_API_KEY: &str = "your_google_ai_api_key_here";

/// Settings for image conversion and the Gemini client.
#[derive(Debug, Clone)]
pub struct VisionSettings {
    /// Google AI API key. `None` when missing, blank, or still the
    /// sample-file placeholder.
    pub api_key: Option<String>,
    pub model: String,
    /// Directory that relative output paths are resolved against.
    pub output_dir: PathBuf,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Log full model output at info level instead of debug.
    pub verbose: bool,
    /// Deadline for one complete conversion, retries included.
    pub request_timeout_secs: u64,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            output_dir: PathBuf::from("./outputs"),
            max_tokens: 4096,
            temperature: 0.1,
            verbose: false,
            request_timeout_secs: 60,
        }
    }
}

impl VisionSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary lookup. Unparseable values fall
    /// back to the defaults rather than failing startup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_key = lookup("GOOGLE_AI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY);

        Self {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            output_dir: lookup("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            max_tokens: lookup("MAX_TOKENS")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: lookup("TEMPERATURE")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.temperature),
            verbose: lookup("VERBOSE")
                .map(|value| is_truthy(&value))
                .unwrap_or(defaults.verbose),
            request_timeout_secs: lookup("VISION_TIMEOUT_SECS")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
