use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / network / server ---
    #[error("failed to bind listener on {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("Missing 'question' in request body")]
    MissingQuestion,

    #[error("{0}")]
    BadRequest(String),

    #[error("Route not found")]
    NotFound,

    /// Answer provider failed; the message is already what the client sees.
    #[error("{0}")]
    Upstream(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::MissingQuestion | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // 5xx
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind { .. } | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR, // startup-only
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::MissingQuestion => "MISSING_QUESTION",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound => "NOT_FOUND",
            AppError::Upstream(_) => "PROVIDER_ERROR",
        }
    }
}

/// Wire shape of every error response: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            // Logged by the handler with model and latency.
            AppError::Upstream(_) => {}
            _ if status.is_server_error() => {
                error!(code = self.error_code(), %status, error = %self, "request failed");
            }
            _ => {
                debug!(code = self.error_code(), %status, error = %self, "request rejected");
            }
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_map_to_client_statuses() {
        assert_eq!(AppError::MissingQuestion.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::BadRequest("nope".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Upstream("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_message_is_passed_through_untouched() {
        let err = AppError::Upstream("[AI LLM Service] operation timed out after 30s".into());
        assert_eq!(err.to_string(), "[AI LLM Service] operation timed out after 30s");
    }
}
