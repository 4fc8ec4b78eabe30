//! OpenAI-compatible chat-completions client used as the default
//! [`PlanGenerator`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::prompt::{build_system_prompt, build_user_prompt};

use super::trait_def::{GenerateError, PlanGenerator};

/// Connection and sampling settings for [`ChatCompletionsClient`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Full chat-completions endpoint URL.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    /// Extra attempts after the first one fails with a retryable error.
    pub max_retries: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay before retry `n` is `retry_backoff * n`.
    pub retry_backoff: Duration,
}

impl GeneratorConfig {
    pub const DEFAULT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
    pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
    pub const DEFAULT_PROBE_MODEL: &str = "llama-3.1-8b-instant";
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_URL.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: Self::DEFAULT_TEMPERATURE,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            retry_backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Chat-completions client with bearer auth, timeout, and retry.
pub struct ChatCompletionsClient {
    client: Client,
    config: GeneratorConfig,
    api_key: String,
}

impl ChatCompletionsClient {
    /// Build a client. Fails with [`GenerateError::MissingApiKey`] when no
    /// non-blank key is configured.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(GenerateError::MissingApiKey)?
            .to_string();

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Check that the service answers at all, using a one-token request
    /// against `model`. Never errors; failures are logged and reported as
    /// `false`.
    pub async fn probe(&self, model: &str) -> bool {
        match self.send_once(model, "", "test", 0.1, Some(1)).await {
            Ok(_) => {
                tracing::info!(model, "generation service reachable");
                true
            }
            Err(e) => {
                tracing::warn!(model, error = %e, "generation service probe failed");
                false
            }
        }
    }

    /// Send a system/user exchange, retrying transient failures.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, GenerateError> {
        let attempts = self.config.max_retries + 1;
        let mut attempt = 1;

        loop {
            let result = self
                .send_once(
                    &self.config.model,
                    system,
                    user,
                    self.config.temperature,
                    None,
                )
                .await;

            match result {
                Ok(content) => return Ok(content),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "generation request failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, GenerateError> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        let request = ChatRequest {
            model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: ChatResponse = response.json().await.map_err(|e| self.map_transport(e))?;

        data.choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty())
            .ok_or(GenerateError::MissingContent)
    }

    fn map_transport(&self, err: reqwest::Error) -> GenerateError {
        if err.is_timeout() {
            GenerateError::Timeout(self.config.timeout)
        } else {
            GenerateError::Http(err)
        }
    }
}

#[async_trait]
impl PlanGenerator for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, report: &str) -> Result<String, GenerateError> {
        let system = build_system_prompt();
        let user = build_user_prompt(report);
        self.complete(&system, &user).await
    }
}
