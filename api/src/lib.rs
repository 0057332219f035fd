mod app;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

pub use crate::{
    app::{api_config::ApiConfig, app_state::AppState},
    error_handler::{AppError, AppResult, ErrorBody},
    middleware_layer::json_error_mapper::REQUEST_ID_HEADER,
    routes::ask::ask_question_route::{GENERIC_PROVIDER_ERROR, SYSTEM_PROMPT},
};

use crate::{
    middleware_layer::json_error_mapper::json_error_mapper,
    routes::{ask::ask_question_route::ask_question, fallback::not_found, health::health_route::health},
};

/// Builds the full HTTP surface: `POST /ask`, `GET /health`, JSON 404 fallback.
pub fn router(state: AppState, cfg: &ApiConfig) -> Router {
    let app = Router::new()
        .route("/ask", post(ask_question))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(json_error_mapper))
        .layer(TraceLayer::new_for_http());

    if cfg.cors_enabled {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

/// Binds `cfg.address` and serves until Ctrl+C / SIGTERM.
pub async fn start(state: AppState, cfg: ApiConfig) -> AppResult<()> {
    let app = router(state, &cfg);

    let listener = tokio::net::TcpListener::bind(&cfg.address)
        .await
        .map_err(|source| AppError::Bind {
            address: cfg.address.clone(),
            source,
        })?;

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| cfg.address.clone());
    info!(
        address = %local,
        cors = cfg.cors_enabled,
        expose_provider_errors = cfg.expose_provider_errors,
        "HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
