use anyhow::{Context, Result};
use std::env;

/// Scheduler intervals. The service-level configuration (mailbox, database,
/// model) comes from the shared `AppConfig`.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Seconds between inbox reconciliation passes.
    pub inbox_poll_interval_seconds: u64,
    /// Seconds between diary generation cycles.
    pub diary_interval_seconds: u64,
    /// Seconds between expiry sweeps.
    pub expiry_interval_seconds: u64,
}

impl PollingConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            inbox_poll_interval_seconds: env::var("INBOX_POLL_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .context("INBOX_POLL_INTERVAL_SECONDS must be a valid number")?,
            diary_interval_seconds: env::var("DIARY_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .context("DIARY_INTERVAL_SECONDS must be a valid number")?,
            expiry_interval_seconds: env::var("EXPIRY_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .context("EXPIRY_INTERVAL_SECONDS must be a valid number")?,
        })
    }
}
