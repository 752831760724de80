use std::time::Duration;

use thiserror::Error;

/// Errors produced by the image-to-inventory pipeline.
///
/// Model output that fails to parse as JSON is deliberately absent here:
/// the extractor wraps it in a fallback envelope instead of failing.
#[derive(Debug, Error)]
pub enum PantryError {
    /// The staged upload is missing, empty, has an unsupported extension,
    /// or cannot be decoded as an image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The vision model cannot be reached at all: no usable API key, or
    /// the credential was rejected outright.
    #[error("vision model unavailable: {0}")]
    ModelUnavailable(String),

    /// A request to the vision model failed. `retryable` marks transport
    /// faults and throttling that a bounded retry may recover from.
    #[error("vision request failed ({model}): {message}")]
    ModelRequest {
        model: String,
        message: String,
        retryable: bool,
    },

    /// The vision call did not complete within the request deadline.
    #[error("vision model call timed out after {0:?}")]
    ModelTimeout(Duration),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PantryError {
    /// Whether a bounded retry is worth attempting for this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ModelRequest { retryable: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_only_for_retryable_requests() {
        let retryable = PantryError::ModelRequest {
            model: "gemini-1.5-flash".into(),
            message: "503 Service Unavailable".into(),
            retryable: true,
        };
        let terminal = PantryError::ModelRequest {
            model: "gemini-1.5-flash".into(),
            message: "400 Bad Request".into(),
            retryable: false,
        };
        assert!(retryable.is_transient());
        assert!(!terminal.is_transient());
        assert!(!PantryError::InvalidImage("empty".into()).is_transient());
        assert!(!PantryError::ModelUnavailable("no key".into()).is_transient());
        assert!(!PantryError::ModelTimeout(Duration::from_secs(60)).is_transient());
    }

    #[test]
    fn test_display_includes_model_name() {
        let err = PantryError::ModelRequest {
            model: "gemini-1.5-flash".into(),
            message: "connection refused".into(),
            retryable: true,
        };
        let text = err.to_string();
        assert!(text.contains("gemini-1.5-flash"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_anyhow_context_wraps_into_other() {
        fn read_config() -> Result<(), PantryError> {
            let io: std::io::Result<()> =
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
            use anyhow::Context;
            io.context("failed to read output file")?;
            Ok(())
        }
        let err = read_config().unwrap_err();
        assert!(matches!(err, PantryError::Other(_)));
        assert!(err.to_string().contains("failed to read output file"));
    }
}
