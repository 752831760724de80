//! Google Gemini vision provider.
//!
//! Talks to the `generateContent` REST endpoint with the image inlined
//! as base64. Transient transport faults and throttling are retried
//! with jittered backoff; credential problems fail immediately.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pantrysnap_core::{PantryError, VisionModel, VisionRequest, VisionResponse};

use crate::retry::RetryPolicy;
use crate::settings::{PLACEHOLDER_API_KEY, VisionSettings};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Per-attempt transport deadline. The caller's request deadline spans
/// all attempts; this one bounds a single hung connection.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini vision provider.
pub struct GeminiVision {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GeminiVision {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_settings(settings: &VisionSettings) -> Self {
        Self::new(settings.api_key.clone(), settings.model.clone())
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn send_once(
        &self,
        api_key: &str,
        request: &VisionRequest,
    ) -> Result<VisionResponse, PantryError> {
        let start = Instant::now();

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: request.prompt.clone(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type.clone(),
                            data: STANDARD.encode(&request.image),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        debug!(
            model = %self.model,
            mime = %request.mime_type,
            image_bytes = request.image.len(),
            "Sending image to Gemini"
        );

        let response = self
            .client
            .post(&url)
            .timeout(ATTEMPT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| PantryError::ModelRequest {
                model: self.model.clone(),
                message: format!("transport error: {}", e.without_url()),
                retryable: true,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.classify_http_failure(status, &error_body));
        }

        let reply: GenerateContentResponse =
            response.json().await.map_err(|e| PantryError::ModelRequest {
                model: self.model.clone(),
                message: format!("failed to parse response body: {}", e.without_url()),
                retryable: false,
            })?;

        if reply.candidates.is_empty() {
            return Err(PantryError::ModelRequest {
                model: self.model.clone(),
                message: "response contained no candidates".to_string(),
                retryable: false,
            });
        }

        let raw_text: String = reply
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let tokens_used = reply
            .usage_metadata
            .as_ref()
            .and_then(|usage| usage.total_token_count)
            .unwrap_or_else(|| raw_text.split_whitespace().count() as u64);

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(latency_ms, tokens_used, "Gemini reply received");

        Ok(VisionResponse {
            raw_text,
            model: self.model.clone(),
            tokens_used,
            latency_ms,
        })
    }

    fn classify_http_failure(&self, status: StatusCode, body: &str) -> PantryError {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return PantryError::ModelUnavailable(format!("API key rejected ({status})"));
        }
        let retryable = status.is_server_error()
            || status == StatusCode::TOO_MANY_REQUESTS
            || status == StatusCode::REQUEST_TIMEOUT;
        PantryError::ModelRequest {
            model: self.model.clone(),
            message: format!("{status}: {}", truncate(body, 300)),
            retryable,
        }
    }
}

#[async_trait]
impl VisionModel for GeminiVision {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse, PantryError> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() && key != PLACEHOLDER_API_KEY => key,
            _ => {
                return Err(PantryError::ModelUnavailable(
                    "GOOGLE_AI_API_KEY is not configured".to_string(),
                ));
            }
        };

        let mut attempt = 1u32;
        loop {
            match self.send_once(api_key, request).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transient() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        attempt,
                        max = self.retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Gemini request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u64>,
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(limit).collect();
        out.push_str("...");
        out
    }
}
