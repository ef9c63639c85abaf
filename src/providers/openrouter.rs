//! OpenRouter chat client.
//!
//! Speaks the OpenAI-compatible `/chat/completions` wire format. Failure
//! modes are mapped onto the error taxonomy the fallback chain keys off:
//! HTTP 429 becomes [`RateLimited`] (honouring a `retry-after` seconds
//! header), a request timeout becomes [`Timeout`], 401/403 become
//! [`AuthenticationFailed`], any other non-2xx becomes [`Api`], and
//! transport failures become [`Http`].
//!
//! [`RateLimited`]: crate::AnikiError::RateLimited
//! [`Timeout`]: crate::AnikiError::Timeout
//! [`AuthenticationFailed`]: crate::AnikiError::AuthenticationFailed
//! [`Api`]: crate::AnikiError::Api
//! [`Http`]: crate::AnikiError::Http

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::ChatProvider;
use crate::types::{ChatOptions, ChatResponse, Message, Usage};
use crate::{AnikiError, Result};

/// Default OpenRouter API base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// HTTP client for the OpenRouter chat completions endpoint.
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterClient {
    /// Create a client against the default OpenRouter base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (wiremock tests, self-hosted gateways).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Request body for `/chat/completions`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Completion response body (the fields we consume).
#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse> {
        let body = ChatRequest {
            model: &options.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnikiError::Timeout
                } else {
                    AnikiError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(AnikiError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AnikiError::AuthenticationFailed);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnikiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AnikiError::Timeout
            } else {
                AnikiError::Http(format!("invalid response body: {e}"))
            }
        })?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AnikiError::EmptyResponse)?
            .to_string();

        Ok(ChatResponse {
            content,
            model: completion.model.or_else(|| Some(options.model.clone())),
            usage: completion.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        })
    }
}

/// `retry-after` seconds header from a 429 response, if present and sane.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
