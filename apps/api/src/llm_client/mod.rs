//! LLM Client: the single point of entry for all model calls in the service.
//!
//! ARCHITECTURAL RULE: No other module may call the completion API directly.
//! All LLM interactions MUST go through `LlmClient`.
//!
//! Calls are never retried: every failure is handed back to the caller so the
//! user sees it immediately.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub mod demo;
pub mod prompts;
#[cfg(test)]
pub mod testing;

const DEEPSEEK_API_URL: &str = "https://api.deepseek.com";
/// The model used for all LLM calls.
/// Hardcoded so diagnosis output stays comparable across deployments.
pub const MODEL: &str = "deepseek-chat";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("API key rejected: {0}")]
    InvalidApiKey(String),

    #[error("Quota exceeded (status {status}): {message}")]
    QuotaExceeded { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One prompt/response round-trip.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    /// Ask the endpoint to constrain the reply to a JSON object.
    pub json_output: bool,
}

/// A completion provider. `LlmClient` holds one behind an `Arc` so the
/// HTTP backend can be swapped for the demo or a scripted one in tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError>;

    /// Short identifier shown on the status endpoint.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible chat completions (DeepSeek)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the non-blank text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions client for DeepSeek's OpenAI-compatible API.
pub struct OpenAiCompatBackend {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiCompatBackend {
    pub fn new(api_key: Option<String>) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, DEEPSEEK_API_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompatBackend {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        // Checked before any I/O so a missing key never reaches the network.
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            response_format: request.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let chat: ChatResponse = response.json().await?;
        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text()
            .map(|t| t.to_string())
            .ok_or(LlmError::EmptyContent)
    }

    fn name(&self) -> &'static str {
        "deepseek"
    }
}

/// Maps a non-success HTTP status onto the error taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::InvalidApiKey(message),
        // DeepSeek reports an empty balance as 402.
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => LlmError::QuotaExceeded {
            status: status.as_u16(),
            message,
        },
        _ => LlmError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Facade
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services.
#[derive(Clone)]
pub struct LlmClient {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmClient {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Makes a single call and returns the raw reply text.
    pub async fn call(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        let started = Instant::now();
        let text = self.backend.complete(request).await?;
        info!(
            backend = self.backend.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_chars = text.chars().count(),
            "LLM call completed"
        );
        Ok(text)
    }

    /// Calls the LLM in JSON mode and deserializes the reply.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<T, LlmError> {
        let request = CompletionRequest {
            json_output: true,
            ..*request
        };
        let text = self.call(&request).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    strip_fences(text, "json")
}

/// Strips ```markdown ... ``` / ```md ... ``` / ``` ... ``` fences from LLM output.
pub fn strip_markdown_fences(text: &str) -> &str {
    let text = text.trim();
    if text.starts_with("```markdown") {
        strip_fences(text, "markdown")
    } else {
        strip_fences(text, "md")
    }
}

fn strip_fences<'a>(text: &'a str, tag: &str) -> &'a str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix(tag).unwrap_or(rest);
    let rest = rest.trim_start();
    rest.strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(rest.trim_end())
}
