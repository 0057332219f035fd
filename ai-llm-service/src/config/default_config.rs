//! Default LLM config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`   = API credential (mandatory, startup fails without it)
//! - `OPENAI_MODEL`     = model identifier (default `gpt-4o`)
//! - `OPENAI_BASE_URL`  = API base URL (default `https://api.openai.com`)
//! - `LLM_TIMEOUT_SECS` = request timeout in seconds (default 60)
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TEMPERATURE`  = optional sampling temperature (0.0..=2.0)

use crate::{
    config::llm_model_config::{DEFAULT_TIMEOUT_SECS, LlmModelConfig},
    error_handler::{
        AiLlmError, ConfigError, EnvLookup, env_opt_f32, env_opt_u32, env_opt_u64, env_or,
        must_env, process_env, validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Constructs the chat config from the process environment.
///
/// # Errors
/// See [`config_openai_chat_with`].
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_chat_with(&process_env)
}

/// Constructs the chat config from an arbitrary variable lookup.
///
/// # Defaults
/// - `timeout_secs = Some(60)`
/// - `temperature`, `top_p`, `max_tokens` left to the provider unless set
///
/// # Errors
/// - [`ConfigError::MissingVar`] if `OPENAI_API_KEY` is missing or blank
/// - [`ConfigError::InvalidFormat`] if `OPENAI_BASE_URL` is not http/https
/// - [`ConfigError::InvalidNumber`] for unparsable numeric variables
/// - [`ConfigError::OutOfRange`] for a zero timeout or a temperature outside `0.0..=2.0`
pub fn config_openai_chat_with(env: EnvLookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env(env, "OPENAI_API_KEY")?;

    let model = env_or(env, "OPENAI_MODEL", DEFAULT_OPENAI_MODEL)
        .trim()
        .to_string();

    let endpoint = env_or(env, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)
        .trim()
        .trim_end_matches('/')
        .to_string();
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;

    let timeout_secs = env_opt_u64(env, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::OutOfRange {
            field: "LLM_TIMEOUT_SECS",
            detail: "expected at least 1 second",
        }
        .into());
    }

    let max_tokens = env_opt_u32(env, "LLM_MAX_TOKENS")?;

    let temperature = env_opt_f32(env, "LLM_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("LLM_TEMPERATURE", t, 0.0, 2.0, "expected 0.0..=2.0")?;
    }

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature,
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_a_startup_error() {
        let env = env_of(&[("OPENAI_MODEL", "gpt-4o-mini")]);
        let err = config_openai_chat_with(&env).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let env = env_of(&[("OPENAI_API_KEY", "sk-test")]);
        let cfg = config_openai_chat_with(&env).unwrap();
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.endpoint, "https://api.openai.com");
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.timeout_secs, Some(60));
        assert_eq!(cfg.max_tokens, None);
        assert_eq!(cfg.temperature, None);
    }

    #[test]
    fn overrides_are_read_and_normalized() {
        let env = env_of(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", " gpt-4o-mini "),
            ("OPENAI_BASE_URL", "http://localhost:9000/"),
            ("LLM_TIMEOUT_SECS", "30"),
            ("LLM_MAX_TOKENS", "512"),
            ("LLM_TEMPERATURE", "0.2"),
        ]);
        let cfg = config_openai_chat_with(&env).unwrap();
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.endpoint, "http://localhost:9000");
        assert_eq!(cfg.timeout_secs, Some(30));
        assert_eq!(cfg.max_tokens, Some(512));
        assert_eq!(cfg.temperature, Some(0.2));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_url = env_of(&[("OPENAI_API_KEY", "k"), ("OPENAI_BASE_URL", "api.openai.com")]);
        assert!(config_openai_chat_with(&bad_url).is_err());

        let zero_timeout = env_of(&[("OPENAI_API_KEY", "k"), ("LLM_TIMEOUT_SECS", "0")]);
        assert!(config_openai_chat_with(&zero_timeout).is_err());

        let hot = env_of(&[("OPENAI_API_KEY", "k"), ("LLM_TEMPERATURE", "3.5")]);
        assert!(config_openai_chat_with(&hot).is_err());
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let env = env_of(&[("OPENAI_API_KEY", "sk-secret")]);
        let cfg = config_openai_chat_with(&env).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
