//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`ProviderError`]). Small helpers for reading/validating environment variables
//! are provided; they take an injectable lookup so configuration can be exercised
//! without touching the process environment.
//!
//! All messages include the prefix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Env lookup                                                                */
/* ------------------------------------------------------------------------- */

/// Variable lookup used by the env helpers. `None` means unset.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Reads from the real process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup only).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream provider rejected the call or answered with something unusable.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (connect, TLS, body read).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL or boolean).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `OPENAI_BASE_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range (e.g., `expected 0.0..=2.0`).
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Failure reported by (or while talking to) the OpenAI API.
#[derive(Debug, Error)]
#[error("[AI LLM Service] OpenAI {kind}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind) -> Self {
        Self { kind }
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    #[error("API key is missing")]
    MissingApiKey,

    #[error("endpoint is invalid: {0}")]
    InvalidEndpoint(String),

    #[error("{0}")]
    HttpStatus(HttpError),

    #[error("response could not be decoded: {0}")]
    Decode(String),

    #[error("response contained no choices with content")]
    EmptyChoices,
}

/// Non-successful upstream HTTP answer.
#[derive(Debug, Error)]
#[error("HTTP {status} from {url}: {snippet}")]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    /// Upstream error message, or a trimmed piece of the raw body.
    pub snippet: String,
}

/// Max characters kept from an upstream body in error messages.
const SNIPPET_MAX_CHARS: usize = 300;

/// Trims a response body down to a single short, log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.is_empty() {
        return "<empty body>".to_string();
    }
    match flat.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}

/// Extracts `error.message` from an OpenAI error envelope, falling back to
/// [`make_snippet`] for anything else.
pub fn upstream_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        message: Option<String>,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(Envelope {
            error: Detail { message: Some(msg) },
        }) if !msg.trim().is_empty() => make_snippet(&msg),
        _ => make_snippet(body),
    }
}

/* ------------------------------------------------------------------------- */
/* Env helpers                                                               */
/* ------------------------------------------------------------------------- */

fn non_blank(env: EnvLookup<'_>, name: &str) -> Option<String> {
    env(name).filter(|v| !v.trim().is_empty())
}

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// [`ConfigError::MissingVar`] if the variable is absent or blank.
pub fn must_env(env: EnvLookup<'_>, name: &'static str) -> Result<String, ConfigError> {
    non_blank(env, name).ok_or(ConfigError::MissingVar(name))
}

/// Fetches an optional variable, falling back to `default` when unset or blank.
pub fn env_or(env: EnvLookup<'_>, name: &str, default: &str) -> String {
    non_blank(env, name).unwrap_or_else(|| default.to_string())
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u32(
    env: EnvLookup<'_>,
    name: &'static str,
) -> Result<Option<u32>, ConfigError> {
    non_blank(env, name)
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        })
        .transpose()
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u64(
    env: EnvLookup<'_>,
    name: &'static str,
) -> Result<Option<u64>, ConfigError> {
    non_blank(env, name)
        .map(|v| {
            v.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        })
        .transpose()
}

/// Parses an optional `f32` from env (`Ok(None)` if unset/empty).
pub fn env_opt_f32(
    env: EnvLookup<'_>,
    name: &'static str,
) -> Result<Option<f32>, ConfigError> {
    non_blank(env, name)
        .map(|v| {
            v.trim().parse::<f32>().map_err(|_| ConfigError::InvalidNumber {
                var: name,
                reason: "expected a decimal number",
            })
        })
        .transpose()
}

/// Parses a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`), using
/// `default` when unset.
pub fn env_bool(
    env: EnvLookup<'_>,
    name: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = non_blank(env, name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFormat {
            var: name,
            reason: "expected true or false",
        }),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
pub fn validate_http_endpoint(
    var: &'static str,
    value: &str,
) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        })
    }
}

/// Validates that a floating-point value lies within an inclusive range.
pub fn validate_range_f32(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
    detail: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, detail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn must_env_rejects_blank_values() {
        let env = lookup(&[("KEY", "   ")]);
        let err = must_env(&env, "KEY").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("KEY")));
        assert!(err.to_string().contains("KEY"));
    }

    #[test]
    fn numeric_helpers_report_the_variable() {
        let env = lookup(&[("N", "12"), ("BAD", "twelve")]);
        assert_eq!(env_opt_u32(&env, "N").unwrap(), Some(12));
        assert_eq!(env_opt_u64(&env, "MISSING").unwrap(), None);
        let err = env_opt_u64(&env, "BAD").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: "BAD", .. }));
    }

    #[test]
    fn bool_flags_accept_common_spellings() {
        let env = lookup(&[("A", "OFF"), ("B", "yes"), ("C", "maybe")]);
        assert!(!env_bool(&env, "A", true).unwrap());
        assert!(env_bool(&env, "B", false).unwrap());
        assert!(env_bool(&env, "UNSET", true).unwrap());
        assert!(env_bool(&env, "C", true).is_err());
    }

    #[test]
    fn snippet_flattens_and_truncates() {
        assert_eq!(make_snippet("  a\n  b  "), "a b");
        assert_eq!(make_snippet(""), "<empty body>");
        let long = "é".repeat(SNIPPET_MAX_CHARS + 10);
        let s = make_snippet(&long);
        assert!(s.ends_with('…'));
        assert_eq!(s.chars().count(), SNIPPET_MAX_CHARS + 1);
    }

    #[test]
    fn upstream_message_prefers_openai_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(upstream_message(body), "Incorrect API key provided");
        assert_eq!(upstream_message("<html>Bad Gateway</html>"), "<html>Bad Gateway</html>");
    }

    #[test]
    fn timeout_message_names_the_duration() {
        let err = AiLlmError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "[AI LLM Service] operation timed out after 30s");
    }
}
