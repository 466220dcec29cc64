//! Chat-completion client for the drawing comparison
//!
//! One request per comparison: a single `user` message whose content parts
//! are, in this order, the instructional prompt, the previous drawing and the
//! current drawing. The model is told the first image is "before" and the
//! second "after", so the order is never changed.
//!
//! No retries, no backoff, no timeout override.

use async_trait::async_trait;
use gdc_common::config::ServiceConfig;
use gdc_common::PromptConfig;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

use super::image_encoder::jpeg_data_uri;
use crate::models::ComparisonOutcome;

const USER_AGENT: &str = concat!("gdc-web/", env!("CARGO_PKG_VERSION"));

/// Comparison request errors
#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    InvalidApiKey(String),

    #[error("Rate limit or quota exceeded: {0}")]
    RateLimited(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Response contained no message content")]
    EmptyResponse,
}

// ============================================================================
// Wire types
// ============================================================================

/// POST body for `/chat/completions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: ImageDetail,
}

/// Fidelity hint for image processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Low,
    High,
    Auto,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Build the comparison request body
///
/// Content order: [instruction, previous image, current image].
pub fn build_request(
    model: &str,
    prompt: &str,
    previous_jpeg_base64: &str,
    current_jpeg_base64: &str,
) -> ChatCompletionRequest {
    let image = |payload: &str| ContentPart::ImageUrl {
        image_url: ImageUrl {
            url: jpeg_data_uri(payload),
            detail: ImageDetail::High,
        },
    };

    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    text: prompt.to_string(),
                },
                image(previous_jpeg_base64),
                image(current_jpeg_base64),
            ],
        }],
    }
}

// ============================================================================
// Comparator seam
// ============================================================================

/// Anything that can compare a previous and a current drawing
#[async_trait]
pub trait DrawingComparator: Send + Sync {
    /// Compare two base64 JPEG payloads, previous first
    async fn compare(
        &self,
        previous_jpeg_base64: &str,
        current_jpeg_base64: &str,
    ) -> Result<String, ComparisonError>;

    /// Model identifier, for diagnostics
    fn model(&self) -> &str;

    /// Prompt version, for diagnostics
    fn prompt_version(&self) -> &str;
}

/// Compare and render the outcome on a single text channel
///
/// Failures come back as `"Error occurred: <message>"`; this never fails.
pub async fn compare_drawings(
    comparator: &dyn DrawingComparator,
    previous_jpeg_base64: &str,
    current_jpeg_base64: &str,
) -> String {
    ComparisonOutcome::from_result(
        comparator
            .compare(previous_jpeg_base64, current_jpeg_base64)
            .await,
    )
    .to_text()
}

// ============================================================================
// HTTP client
// ============================================================================

/// Chat-completion API client
pub struct VisionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    prompt: PromptConfig,
}

impl VisionClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ComparisonError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ComparisonError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", config.api_base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            prompt: config.prompt.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DrawingComparator for VisionClient {
    async fn compare(
        &self,
        previous_jpeg_base64: &str,
        current_jpeg_base64: &str,
    ) -> Result<String, ComparisonError> {
        let body = build_request(
            &self.model,
            &self.prompt.text,
            previous_jpeg_base64,
            current_jpeg_base64,
        );

        tracing::info!(
            model = %self.model,
            prompt_version = %self.prompt.version,
            previous_bytes = previous_jpeg_base64.len(),
            current_bytes = current_jpeg_base64.len(),
            "Sending drawing comparison request"
        );
        let started = Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ComparisonError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = api_error_message(&error_text);
            tracing::warn!(
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Comparison request rejected"
            );
            return Err(match status.as_u16() {
                401 | 403 => ComparisonError::InvalidApiKey(message),
                429 => ComparisonError::RateLimited(message),
                code => ComparisonError::Api(code, message),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ComparisonError::Parse(e.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ComparisonError::EmptyResponse)?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_chars = text.chars().count(),
            "Comparison response received"
        );

        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn prompt_version(&self) -> &str {
        &self.prompt.version
    }
}

/// Prefer the API's own error message; fall back to the raw body
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "no error body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
