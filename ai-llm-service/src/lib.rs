//! OpenAI chat-completions client for the ask service.
//!
//! - [`config`]: model config and env-driven defaults
//! - [`services`]: the [`AnswerProvider`] seam and the [`OpenAiService`] implementation
//! - [`error_handler`]: unified [`AiLlmError`] and env helpers
//! - [`telemetry`]: tracing layer and filter shared by the binary

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use services::{answer_provider::AnswerProvider, open_ai_service::OpenAiService};
