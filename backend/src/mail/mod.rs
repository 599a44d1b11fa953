pub mod imap;
pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mailbox address: {0}")]
    InvalidAddress(String),
}

/// Derive the alias address that scopes which inbound mail this system is
/// allowed to touch. The tag is appended to the full local part, so an
/// existing plus-tag is preserved:
/// `user+existing@domain` -> `user+existing+travel-pet@domain`.
pub fn alias_address(base: &str, tag: &str) -> Result<String, MailError> {
    let (local, domain) = base
        .split_once('@')
        .ok_or_else(|| MailError::InvalidAddress(base.to_string()))?;

    if local.is_empty() || domain.is_empty() {
        return Err(MailError::InvalidAddress(base.to_string()));
    }

    Ok(format!("{local}+{tag}@{domain}"))
}

/// An outbound notification or diary email.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    /// Optional HTML alternative part.
    pub html: Option<String>,
}

/// Send side of the mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingEmail) -> anyhow::Result<()>;
}
