use std::sync::Arc;

use ai_llm_service::AnswerProvider;

/// Shared state for all HTTP handlers.
///
/// Read-only after construction; cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    /// Backend that turns a question into an answer (OpenAI in production).
    pub provider: Arc<dyn AnswerProvider>,
    /// Model identifier sent with every provider call.
    pub model: String,
    /// Put the provider's error text into 500 bodies; when off, clients get
    /// a generic message and the detail only goes to the log.
    pub expose_provider_errors: bool,
}

impl AppState {
    pub fn new(provider: Arc<dyn AnswerProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            expose_provider_errors: true,
        }
    }

    pub fn with_expose_provider_errors(mut self, expose: bool) -> Self {
        self.expose_provider_errors = expose;
        self
    }
}
