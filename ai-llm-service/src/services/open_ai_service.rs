//! OpenAI (ChatGPT) service for text generation.
//!
//! Minimal, non-streaming client around the OpenAI REST API. The endpoint is
//! derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions (chat completion)
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.model` must not be empty
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, HttpError, ProviderError, ProviderErrorKind, upstream_message,
    },
    services::answer_provider::AnswerProvider,
};

/// Thin client for the OpenAI API (ChatGPT).
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers), which
/// is cheap to share across concurrent requests.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    timeout: Duration,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::Config`] with `EmptyModel` if `cfg.model` is blank
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(
                ProviderError::new(ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone())).into(),
            );
        }

        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let timeout = cfg.timeout();

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Decode(format!(
                    "invalid API key header: {e}"
                )))
            })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/');
        let url_chat = format!("{base}/v1/chat/completions");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            timeout,
        })
    }

    /// Model configured for this client.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** chat completion request (`/v1/chat/completions`).
    ///
    /// `messages` array:
    /// - optional system message (if provided)
    /// - user message with `prompt`, verbatim.
    ///
    /// Options from config: `temperature`, `top_p`, `max_tokens`.
    ///
    /// # Errors
    /// - [`AiLlmError::Timeout`] when the configured timeout elapses
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for other client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`AiLlmError::Provider`] with `EmptyChoices` if no choice has content
    pub async fn chat(
        &self,
        model: &str,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, model, prompt, system);

        debug!(
            model = %model,
            endpoint = %self.cfg.endpoint,
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e, started))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = upstream_message(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %model,
                latency_ms = started.elapsed().as_millis(),
                "OpenAI /v1/chat/completions returned non-success status"
            );

            return Err(ProviderError::new(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url,
                snippet,
            }))
            .into());
        }

        let raw = resp
            .bytes()
            .await
            .map_err(|e| self.transport_error(e, started))?;

        let out: ChatCompletionResponse = match serde_json::from_slice(&raw) {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode /v1/chat/completions response"
                );
                return Err(ProviderError::new(ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                )))
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyChoices))?;

        info!(
            model = %model,
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }

    fn transport_error(&self, e: reqwest::Error, started: Instant) -> AiLlmError {
        let latency_ms = started.elapsed().as_millis();
        if e.is_timeout() {
            error!(
                timeout_secs = self.timeout.as_secs(),
                latency_ms, "OpenAI request timed out"
            );
            AiLlmError::Timeout(self.timeout)
        } else {
            error!(error = %e, latency_ms, "OpenAI request failed");
            AiLlmError::HttpTransport(e)
        }
    }
}

#[async_trait]
impl AnswerProvider for OpenAiService {
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
        model: &str,
    ) -> Result<String, AiLlmError> {
        self.chat(model, user_message, Some(system_prompt)).await
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(
        cfg: &'a LlmModelConfig,
        model: &'a str,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    /// "system" | "user"
    role: &'a str,
    content: &'a str,
}

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}
