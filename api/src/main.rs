use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use tokio_util::sync::CancellationToken;

use tp_api::app::create_app;
use tp_api::routes::token::AppState;
use tp_core::services::{RefreshOrchestrator, TokenCleanupConfig, TokenCleanupService};
use tp_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = AppConfig::from_env();

    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.environment.default_log_level()),
    );

    info!("Starting TokenProvider API Server ({})", config.environment);

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let store = tp_infra::create_refresh_token_store(&config.database)
        .await
        .context("Failed to initialise the refresh token store")?;

    let orchestrator = Arc::new(
        RefreshOrchestrator::new(store.clone(), &config.token)
            .context("Failed to initialise the token signer")?,
    );

    let shutdown = CancellationToken::new();
    let cleanup = Arc::new(TokenCleanupService::new(
        store.clone(),
        TokenCleanupConfig::from_token_config(&config.token),
    ));
    let cleanup_task = cleanup.start_background_task(shutdown.clone());

    let app_state = web::Data::new(AppState::new(orchestrator, store));
    let server_config = config.server.clone();

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone(), &server_config))
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    info!("Server stopped, shutting down background tasks");
    shutdown.cancel();
    if let Some(task) = cleanup_task {
        let _ = task.await;
    }

    Ok(())
}
