use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;

use otp_api::{create_app, telemetry, AppState};
use otp_core::services::otp::{OtpService, OtpStore, OtpSweeper};
use otp_infra::{create_notifier, HttpTransactionLookup};
use otp_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging)?;
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    tracing::info!(
        environment = %config.environment,
        ttl_seconds = config.otp.ttl_seconds,
        max_attempts = config.otp.max_attempts,
        "Starting TxOTP server"
    );

    let lookup = Arc::new(
        HttpTransactionLookup::from_config(&config.services)
            .context("Failed to create transaction lookup")?,
    );
    let notifier = Arc::new(
        create_notifier(&config.services, config.environment)
            .context("Failed to create notifier")?,
    );

    let store = Arc::new(OtpStore::with_system_clock(&config.otp));
    let sweeper = OtpSweeper::from_config(store.clone(), &config.otp).start();

    let otp_service = Arc::new(OtpService::new(store, lookup, notifier));
    let app_state = web::Data::new(AppState::new(otp_service));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let cors = config.cors.clone();
    let mut server = HttpServer::new(move || create_app(app_state.clone(), &cors));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    let served = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await;

    let timeout = Duration::from_millis(config.otp.shutdown_timeout_ms);
    if sweeper.shutdown(timeout).await {
        tracing::info!("Shutdown complete");
    } else {
        tracing::warn!("Sweeper was aborted during shutdown");
    }

    served.context("HTTP server error")
}
