//! Single-shot LLM client for OpenAI-compatible endpoints.
//!
//! Epistemic foundation:
//! - K_i: The chat-completions schema is the de facto standard; Gemini,
//!   OpenRouter and on-prem servers (vLLM, Ollama) all speak it
//! - B_i: The API will respond within the timeout (might fail)
//! - B_i: The response will be valid JSON (might fail)
//! - I^B: Availability is unknowable → surfaced as one Result per attempt;
//!   the retry policy lives in [`RetryingGenerator`](super::RetryingGenerator)

use crate::client::TextGenerator;
use crate::models::{ApiError, DidactError, ModelConfig, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Message in a chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request payload.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
}

/// Chat completion response.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// API error response (OpenAI-compatible).
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Response from one completion request.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,
    /// Model used (may differ from requested)
    pub model: String,
    /// Input tokens
    pub input_tokens: u32,
    /// Output tokens
    pub output_tokens: u32,
    /// Request duration
    pub duration: Duration,
}

/// Single-shot client for any OpenAI-compatible chat endpoint.
///
/// Performs exactly one attempt per call and maps every failure mode into
/// the error taxonomy; resilience is layered on top by the retry policy.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    system_prompt: Option<String>,
    timeout: Duration,
}

impl LlmClient {
    /// Create a client from the model configuration and a resolved API key.
    pub fn new(config: &ModelConfig, api_key: String) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DidactError::Network)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.id.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
            timeout,
        })
    }

    /// The configured model ID.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Complete a chat request. One attempt, no retry.
    pub async fn complete(&self, messages: Vec<Message>) -> Result<CompletionResponse> {
        let start = Instant::now();

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DidactError::Timeout(self.timeout)
                } else {
                    DidactError::Network(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<f64>().ok());

            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .map(|e| e.error.message)
                .unwrap_or(error_body);

            let error = match status.as_u16() {
                401 | 403 => ApiError::AuthenticationFailed,
                404 => ApiError::ModelNotFound(self.model.clone()),
                429 => ApiError::RateLimited {
                    retry_after_secs: retry_after,
                },
                code => ApiError::Status {
                    status: code,
                    message,
                },
            };
            return Err(DidactError::Api(error));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            DidactError::Api(ApiError::InvalidResponse(format!(
                "failed to decode response: {e}"
            )))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                DidactError::Api(ApiError::InvalidResponse("no choices in response".to_string()))
            })?;

        let usage = body.usage.unwrap_or_default();

        debug!(
            model = %self.model,
            tokens_in = usage.prompt_tokens,
            tokens_out = usage.completion_tokens,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Completion received"
        );

        Ok(CompletionResponse {
            content,
            model: body.model.unwrap_or_else(|| self.model.clone()),
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            duration: start.elapsed(),
        })
    }

    /// Health check: ping the /models endpoint.
    ///
    /// B_i: the endpoint is healthy if /models returns 200.
    pub async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let url = format!("{}/models", self.base_url);

        match self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(10))
            .send()
            .await
        {
            Ok(response) => {
                let latency_ms = start.elapsed().as_millis() as u64;
                if response.status().is_success() {
                    HealthCheckResult {
                        status: HealthStatus::Healthy,
                        latency_ms: Some(latency_ms),
                        error: None,
                    }
                } else {
                    HealthCheckResult {
                        status: HealthStatus::Unhealthy,
                        latency_ms: Some(latency_ms),
                        error: Some(format!("HTTP {}", response.status().as_u16())),
                    }
                }
            }
            Err(e) => HealthCheckResult {
                status: HealthStatus::Unreachable,
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(prompt));

        let response = self.complete(messages).await?;
        Ok(response.content)
    }
}

/// Health check result.
#[derive(Debug, Clone)]
pub struct HealthCheckResult {
    /// Health status
    pub status: HealthStatus,
    /// Latency in milliseconds (if reachable)
    pub latency_ms: Option<u64>,
    /// Error message (if unhealthy or unreachable)
    pub error: Option<String>,
}

/// Health status of the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Endpoint is responding normally
    Healthy,
    /// Endpoint is responding but with errors
    Unhealthy,
    /// Endpoint is not reachable
    Unreachable,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
            HealthStatus::Unreachable => write!(f, "unreachable"),
        }
    }
}
