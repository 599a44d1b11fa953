use anyhow::{Context, Result};
use std::env;

/// Runtime configuration, read once at startup. Secrets (mailbox address,
/// app password, model API key) are supplied through the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,

    /// Base mailbox address. Inbound signup mail is scoped to the derived
    /// alias address; outbound mail is sent from the alias.
    pub email_address: String,
    pub email_app_password: String,
    pub imap_host: String,
    pub smtp_host: String,
    /// IMAP folder (label) holding signup mail.
    pub mail_folder: String,
    /// Tag appended to the local part of the base address.
    pub alias_tag: String,
    /// Subject marker that classifies a message as an unsubscribe request.
    pub unsubscribe_marker: String,

    pub gemini_api_key: String,
    pub gemini_text_model: String,
    pub gemini_image_model: String,

    /// Days until a pet is expired and deleted.
    pub pet_lifespan_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            email_address: env::var("EMAIL_ADDRESS")
                .context("EMAIL_ADDRESS must be set")?,
            email_app_password: env::var("EMAIL_APP_PASSWORD")
                .context("EMAIL_APP_PASSWORD must be set")?,
            imap_host: env::var("IMAP_HOST")
                .unwrap_or_else(|_| "imap.gmail.com".to_string()),
            smtp_host: env::var("SMTP_HOST")
                .unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            mail_folder: env::var("MAIL_FOLDER")
                .unwrap_or_else(|_| "Travel-Pet".to_string()),
            alias_tag: env::var("ALIAS_TAG")
                .unwrap_or_else(|_| "travel-pet".to_string()),
            unsubscribe_marker: env::var("UNSUBSCRIBE_MARKER")
                .unwrap_or_else(|_| "配信停止".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY must be set")?,
            gemini_text_model: env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            gemini_image_model: env::var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|_| "imagen-3.0-generate-002".to_string()),
            pet_lifespan_days: env::var("PET_LIFESPAN_DAYS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("PET_LIFESPAN_DAYS must be a valid number")?,
        })
    }
}
