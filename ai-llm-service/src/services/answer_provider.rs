//! Provider seam between HTTP handlers and the concrete LLM client.
//!
//! Handlers hold an `Arc<dyn AnswerProvider>` so tests can swap in a stub
//! without any network access.

use async_trait::async_trait;

use crate::error_handler::AiLlmError;

/// Something that turns a system instruction plus one user message into a
/// generated answer.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Runs a single, non-streaming two-message completion.
    ///
    /// # Errors
    /// Any upstream problem (transport, timeout, auth/quota status, malformed
    /// response) as an [`AiLlmError`].
    async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
        model: &str,
    ) -> Result<String, AiLlmError>;
}
