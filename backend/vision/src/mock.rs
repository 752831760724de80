//! Mock vision model for tests and keyless local development.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use pantrysnap_core::{PantryError, VisionModel, VisionRequest, VisionResponse};

/// A vision model that returns canned text without any network access.
///
/// Failure injection covers the cases the pipeline must absorb: a
/// provider that is down entirely, one that fails transiently, and one
/// that is too slow to answer.
pub struct MockVision {
    response: String,
    tokens_used: u64,
    delay: Option<Duration>,
    fail_first: u32,
    unavailable: bool,
    calls: AtomicU32,
    seen_prompts: Mutex<Vec<String>>,
}

impl MockVision {
    pub fn new(response: impl Into<String>) -> Self {
        let response = response.into();
        let tokens_used = response.split_whitespace().count() as u64;
        Self {
            response,
            tokens_used,
            delay: None,
            fail_first: 0,
            unavailable: false,
            calls: AtomicU32::new(0),
            seen_prompts: Mutex::new(Vec::new()),
        }
    }

    /// A provider that always reports itself unavailable.
    pub fn unavailable() -> Self {
        let mut mock = Self::new("");
        mock.unavailable = true;
        mock
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the first `count` calls with a retryable error.
    pub fn with_transient_failures(mut self, count: u32) -> Self {
        self.fail_first = count;
        self
    }

    /// How many times `describe` was invoked.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts seen so far, in call order.
    pub fn seen_prompts(&self) -> Vec<String> {
        self.seen_prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionModel for MockVision {
    fn name(&self) -> &str {
        "mock"
    }

    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse, PantryError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut prompts) = self.seen_prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.unavailable {
            return Err(PantryError::ModelUnavailable(
                "mock provider is configured unavailable".to_string(),
            ));
        }

        if call <= self.fail_first {
            return Err(PantryError::ModelRequest {
                model: "mock".to_string(),
                message: format!("injected transient failure on call {call}"),
                retryable: true,
            });
        }

        Ok(VisionResponse {
            raw_text: self.response.clone(),
            model: "mock".to_string(),
            tokens_used: self.tokens_used,
            latency_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> VisionRequest {
        VisionRequest {
            image: vec![1u8, 2, 3].into(),
            mime_type: "image/png".to_string(),
            prompt: "what is in this image".to_string(),
            max_tokens: 128,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn returns_canned_response_and_counts_calls() {
        let mock = MockVision::new("a shelf of groceries");
        let reply = mock.describe(&request()).await.unwrap();
        assert_eq!(reply.raw_text, "a shelf of groceries");
        assert_eq!(reply.tokens_used, 4);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.seen_prompts(), vec!["what is in this image"]);
    }

    #[tokio::test]
    async fn transient_failures_then_success() {
        let mock = MockVision::new("ok").with_transient_failures(2);
        assert!(mock.describe(&request()).await.unwrap_err().is_transient());
        assert!(mock.describe(&request()).await.unwrap_err().is_transient());
        assert!(mock.describe(&request()).await.is_ok());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn unavailable_mock_always_fails() {
        let mock = MockVision::unavailable();
        let err = mock.describe(&request()).await.unwrap_err();
        assert!(matches!(err, PantryError::ModelUnavailable(_)));
        assert!(!err.is_transient());
    }
}
