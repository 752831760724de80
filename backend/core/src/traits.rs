use async_trait::async_trait;
use bytes::Bytes;

use crate::error::PantryError;

/// A single request to a vision model.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Raw image bytes, already validated as a decodable image.
    pub image: Bytes,
    /// MIME type of `image`, e.g. "image/jpeg".
    pub mime_type: String,
    /// Instruction describing what the model should extract.
    pub prompt: String,
    /// Maximum tokens for the model's reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// The model's reply, before any JSON extraction.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    /// Model output text, preserved verbatim.
    pub raw_text: String,
    /// Which model produced the reply.
    pub model: String,
    /// Token usage as reported by the provider, or a word-count
    /// estimate when the provider omits usage metadata.
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// A vision model that can describe an image as text.
///
/// Implementations own their credentials, transport, and retry policy.
/// Callers apply the request deadline.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Provider name for logs and metadata.
    fn name(&self) -> &str;

    /// Send one image and prompt to the model and return its reply.
    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse, PantryError>;
}
