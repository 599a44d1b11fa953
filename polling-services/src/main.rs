mod config;
mod scheduler;

use anyhow::Result;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backend::config::AppConfig;
use backend::state::AppState;

use crate::config::PollingConfig;
use crate::scheduler::PollingScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polling_services=debug,backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting travel pet polling services");

    dotenvy::dotenv().ok();
    let config = PollingConfig::from_env()?;

    let state = AppState::from_config(AppConfig::from_env()?)?;
    tracing::info!("Application state initialized");

    let scheduler = PollingScheduler::new(state, config);

    let scheduler_handle = tokio::spawn(async move {
        if let Err(e) = scheduler.run().await {
            tracing::error!("Scheduler error: {:?}", e);
        }
    });

    tracing::info!("Polling services running. Press Ctrl+C to stop.");
    signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping...");

    scheduler_handle.abort();

    tracing::info!("Polling services stopped");
    Ok(())
}
