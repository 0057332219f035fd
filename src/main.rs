use std::{error::Error, sync::Arc};

use ai_llm_service::{OpenAiService, config::default_config::config_openai_chat, telemetry};
use api::{ApiConfig, AppState};
use tracing::{Level, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Optional .env in the working directory; already-set variables win.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .init();

    // Fail fast: without a credential the service must not start listening.
    let llm_cfg = config_openai_chat().inspect_err(|e| {
        error!(error = %e, "refusing to start: LLM configuration is invalid");
    })?;
    let api_cfg = ApiConfig::from_env().inspect_err(|e| {
        error!(error = %e, "refusing to start: API configuration is invalid");
    })?;

    let model = llm_cfg.model.clone();
    let provider = Arc::new(OpenAiService::new(llm_cfg)?);
    let state = AppState::new(provider, model.clone())
        .with_expose_provider_errors(api_cfg.expose_provider_errors);

    info!(%model, address = %api_cfg.address, "starting ask-backend");

    api::start(state, api_cfg).await?;

    Ok(())
}
