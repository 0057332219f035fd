/// Configuration for an OpenAI chat-completions model invocation.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"gpt-4o"`).
/// - `endpoint`: API base URL without the `/v1/...` suffix.
/// - `api_key`: Bearer credential; required by [`OpenAiService::new`](crate::services::open_ai_service::OpenAiService::new).
/// - `max_tokens`: Maximum number of tokens to generate.
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Request timeout in seconds; `None` means the 60 s default.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "gpt-4o".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(30),
/// };
/// assert_eq!(cfg.timeout().as_secs(), 30);
/// ```
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string (e.g., `"gpt-4o"`).
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

/// Timeout applied when `timeout_secs` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

impl LlmModelConfig {
    /// Effective request timeout.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

// Hand-written so the key never reaches logs.
impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
