use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::db::establish_connection_pool;
use crate::genai::{GeminiClient, PetModel};
use crate::mail::smtp::SmtpMailer;
use crate::mail::{alias_address, Mailer};
use crate::services::diary::DiaryService;
use crate::services::pets::PetLifecycleService;
use crate::services::templates;
use crate::store::{PetStore, PgPetStore};

/// Shared application state for handlers and the scheduler.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pets: Arc<PetLifecycleService>,
    pub diary: Arc<DiaryService>,
    pub model: Arc<dyn PetModel>,
}

impl AppState {
    /// Wire up the production dependency graph from configuration.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let pool = establish_connection_pool(&config.database_url)?;
        let alias = alias_address(&config.email_address, &config.alias_tag)?;

        let store: Arc<dyn PetStore> = Arc::new(PgPetStore::new(pool));
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(
            &config.smtp_host,
            &config.email_address,
            &config.email_app_password,
            &alias,
            templates::SENDER_NAME,
        )?);
        let model: Arc<dyn PetModel> = Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_text_model.clone(),
            config.gemini_image_model.clone(),
        )?);

        let pets = Arc::new(PetLifecycleService::new(
            store.clone(),
            mailer.clone(),
            model.clone(),
            config.pet_lifespan_days,
        ));
        let diary = Arc::new(DiaryService::new(store, mailer, model.clone()));

        Ok(Self {
            config,
            pets,
            diary,
            model,
        })
    }
}
