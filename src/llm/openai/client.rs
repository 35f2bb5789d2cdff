//! OpenAI-compatible chat completion client

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::llm::core::{
    error::LlmError,
    provider::{ChunkStream, CompletionProvider},
    types::{Completion, CompletionRequest},
};

use super::mapper::{from_openai_chunk, from_openai_response, to_openai_request};
use super::sse::parse_sse_stream;
use super::types::{ChatCompletionResponse, ErrorEnvelope};

/// Static connection settings for the completion endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Bearer credential
    pub api_key: String,
    /// Model identifier sent with every request
    pub model: String,
}

impl OpenAiConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Full URL of the chat completions endpoint
    pub fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.base_url.trim().is_empty() {
            return Err(LlmError::InvalidRequest("base URL is empty".to_string()));
        }

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send(&self, request: CompletionRequest, stream: bool) -> Result<Response, LlmError> {
        let body = to_openai_request(&self.config.model, request, stream);

        let response = self
            .http_client
            .post(self.config.endpoint_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        check_status(response).await
    }
}

/// Turn a non-2xx response into the matching error
async fn check_status(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        warn!(?retry_after, "completion provider rate limited the request");
        return Err(LlmError::RateLimitExceeded { retry_after });
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "completion provider returned an error status");

    Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => LlmError::ProviderError {
            code: envelope.error.code_string(),
            message: envelope.error.message,
        },
        Err(_) => LlmError::HttpError {
            status: status.as_u16(),
            body,
        },
    })
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let response = self.send(request, false).await?;
        let body = response.text().await?;

        let value: serde_json::Value = serde_json::from_str(&body)?;
        if value.get("error").is_some() {
            let envelope: ErrorEnvelope = serde_json::from_value(value)?;
            return Err(LlmError::ProviderError {
                code: envelope.error.code_string(),
                message: envelope.error.message,
            });
        }

        let response: ChatCompletionResponse = serde_json::from_value(value)?;
        let completion = from_openai_response(response)?;
        if let Some(usage) = &completion.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "completion finished"
            );
        }
        Ok(completion)
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<ChunkStream, LlmError> {
        let response = self.send(request, true).await?;

        let byte_stream = response.bytes_stream();
        let chunks = parse_sse_stream(Box::pin(byte_stream))
            .map(|result| result.map(from_openai_chunk));

        Ok(Box::pin(chunks))
    }
}
