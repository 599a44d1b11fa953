use anyhow::Result;
use std::time::Duration;
use tokio::time;

use backend::services::inbox::reconcile_inbox;
use backend::state::AppState;

use crate::config::PollingConfig;

pub struct PollingScheduler {
    state: AppState,
    config: PollingConfig,
}

impl PollingScheduler {
    pub fn new(state: AppState, config: PollingConfig) -> Self {
        Self { state, config }
    }

    pub async fn run(&self) -> Result<()> {
        tracing::info!("Starting polling scheduler");

        let inbox_state = self.state.clone();
        let inbox_interval = self.config.inbox_poll_interval_seconds;
        let inbox_handle = tokio::spawn(async move {
            Self::run_inbox_loop(inbox_state, inbox_interval).await
        });

        let diary_state = self.state.clone();
        let diary_interval = self.config.diary_interval_seconds;
        let diary_handle = tokio::spawn(async move {
            Self::run_diary_loop(diary_state, diary_interval).await
        });

        let expiry_state = self.state.clone();
        let expiry_interval = self.config.expiry_interval_seconds;
        let expiry_handle = tokio::spawn(async move {
            Self::run_expiry_loop(expiry_state, expiry_interval).await
        });

        // None of the loops return unless a task panics.
        tokio::select! {
            result = inbox_handle => {
                if let Err(e) = result {
                    tracing::error!("Inbox loop task error: {:?}", e);
                }
            }
            result = diary_handle => {
                if let Err(e) = result {
                    tracing::error!("Diary loop task error: {:?}", e);
                }
            }
            result = expiry_handle => {
                if let Err(e) = result {
                    tracing::error!("Expiry loop task error: {:?}", e);
                }
            }
        }

        Ok(())
    }

    async fn run_inbox_loop(state: AppState, interval_secs: u64) -> Result<()> {
        let interval = Duration::from_secs(interval_secs);
        let mut ticker = time::interval(interval);

        tracing::info!("Inbox reconciliation loop started (interval: {:?})", interval);

        loop {
            ticker.tick().await;
            tracing::debug!("Running inbox reconciliation pass");

            if let Err(e) = reconcile_inbox(&state.config, state.pets.as_ref()).await {
                tracing::error!("Inbox reconciliation error: {:?}", e);
                // Keep polling even on error
            }
        }
    }

    async fn run_diary_loop(state: AppState, interval_secs: u64) -> Result<()> {
        let interval = Duration::from_secs(interval_secs);
        let mut ticker = time::interval(interval);

        tracing::info!("Diary loop started (interval: {:?})", interval);

        loop {
            ticker.tick().await;
            tracing::debug!("Running diary generation cycle");

            if let Err(e) = state.diary.generate_diaries_for_all_pets().await {
                tracing::error!("Diary generation error: {:?}", e);
            }
        }
    }

    async fn run_expiry_loop(state: AppState, interval_secs: u64) -> Result<()> {
        let interval = Duration::from_secs(interval_secs);
        let mut ticker = time::interval(interval);

        tracing::info!("Expiry loop started (interval: {:?})", interval);

        loop {
            ticker.tick().await;
            tracing::debug!("Running expiry sweep");

            if let Err(e) = state.pets.expire_old_pets().await {
                tracing::error!("Expiry sweep error: {:?}", e);
            }
        }
    }
}
