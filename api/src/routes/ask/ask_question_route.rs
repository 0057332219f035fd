//! POST /ask: forwards one question to the answer provider.

use std::time::Instant;

use axum::{Json, body::Bytes, extract::State};
use tracing::{info, warn};

use crate::{
    app::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// System instruction sent ahead of every question.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Client-facing text for provider failures when error details are hidden.
pub const GENERIC_PROVIDER_ERROR: &str = "Failed to generate an answer";

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is 2+2?"}'
/// ```
pub async fn ask_question(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<AskResponse>> {
    let question = AskRequest::from_body(&body)?.into_question()?;

    let started = Instant::now();
    let answer = state
        .provider
        .generate(SYSTEM_PROMPT, &question, &state.model)
        .await
        .map_err(|e| {
            warn!(
                error = %e,
                model = %state.model,
                latency_ms = started.elapsed().as_millis(),
                "answer provider failed"
            );
            if state.expose_provider_errors {
                AppError::Upstream(e.to_string())
            } else {
                AppError::Upstream(GENERIC_PROVIDER_ERROR.to_string())
            }
        })?;

    info!(
        model = %state.model,
        question_len = question.len(),
        answer_len = answer.len(),
        latency_ms = started.elapsed().as_millis(),
        "question answered"
    );

    Ok(Json(AskResponse { answer }))
}
