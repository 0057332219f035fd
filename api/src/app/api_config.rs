//! HTTP-layer settings read from the environment.
//!
//! - `API_ADDRESS`                = bind address (default `0.0.0.0:8080`)
//! - `API_CORS_ENABLED`           = allow cross-origin calls from any origin (default `true`)
//! - `API_EXPOSE_PROVIDER_ERRORS` = return provider error text to clients (default `true`)

use ai_llm_service::error_handler::{ConfigError, EnvLookup, env_bool, env_or, process_env};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub address: String,
    pub cors_enabled: bool,
    pub expose_provider_errors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_API_ADDRESS.to_string(),
            cors_enabled: true,
            expose_provider_errors: true,
        }
    }
}

impl ApiConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            address: env_or(env, "API_ADDRESS", DEFAULT_API_ADDRESS)
                .trim()
                .to_string(),
            cors_enabled: env_bool(env, "API_CORS_ENABLED", true)?,
            expose_provider_errors: env_bool(env, "API_EXPOSE_PROVIDER_ERRORS", true)?,
        })
    }
}
