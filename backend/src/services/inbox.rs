//! Inbox reconciliation.
//!
//! One pass drains the unseen alias-addressed mail and converges the pet
//! registry onto it: unsubscribe requests remove the sender's pet, anything
//! else is a signup. Every surfaced message is flagged seen in one batch at
//! the end of the pass, whether or not its action succeeded, so a poison
//! message cannot wedge the loop.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::AppConfig;
use crate::mail::alias_address;
use crate::mail::imap::{ImapMailbox, InboundMessage, MailboxSession};

/// Registry actions the reconciler can take against the pet store.
#[async_trait]
pub trait PetRegistry: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Create a pet for `email` and send the welcome mail.
    async fn create(&self, email: &str) -> Result<()>;

    /// Remove the pet registered to `email`. Returns whether one existed.
    async fn delete_by_email(&self, email: &str) -> Result<bool>;

    async fn notify_unsubscribed(&self, email: &str) -> Result<()>;

    async fn notify_already_registered(&self, email: &str) -> Result<()>;
}

#[derive(Debug, PartialEq, Eq)]
enum Classification {
    Unsubscribe,
    Duplicate,
    NewSignup,
}

pub struct InboxReconciler {
    unsubscribe_marker: String,
}

impl InboxReconciler {
    pub fn new(unsubscribe_marker: &str) -> Self {
        Self {
            unsubscribe_marker: unsubscribe_marker.to_string(),
        }
    }

    /// Run one reconciliation pass over `mailbox`.
    pub async fn reconcile(
        &self,
        mailbox: &mut dyn MailboxSession,
        alias: &str,
        registry: &dyn PetRegistry,
    ) -> Result<()> {
        let seqs = mailbox.search_unseen_to(alias).await?;
        if seqs.is_empty() {
            tracing::info!("No unseen messages for: {}", alias);
            mailbox.logout().await?;
            return Ok(());
        }

        tracing::info!("Processing {} unseen messages", seqs.len());
        let messages = mailbox.fetch(&seqs).await?;

        for message in &messages {
            if let Err(e) = self.process_message(message, registry).await {
                tracing::error!("Failed to process message {}: {:#}", message.seq, e);
            }
        }

        // Flag everything we surfaced, processed or not.
        mailbox.mark_seen(&seqs).await?;
        mailbox.logout().await?;

        Ok(())
    }

    async fn process_message(
        &self,
        message: &InboundMessage,
        registry: &dyn PetRegistry,
    ) -> Result<()> {
        let Some(sender) = message.sender.as_deref() else {
            tracing::warn!("Message {} has no sender, skipping", message.seq);
            return Ok(());
        };

        match self.classify(message, sender, registry).await? {
            Classification::Unsubscribe => {
                tracing::info!("Unsubscribe request from: {}", sender);
                registry.delete_by_email(sender).await?;
                registry.notify_unsubscribed(sender).await?;
            }
            Classification::Duplicate => {
                tracing::info!("Signup from already registered: {}", sender);
                registry.notify_already_registered(sender).await?;
            }
            Classification::NewSignup => {
                tracing::info!("New signup from: {}", sender);
                registry.create(sender).await?;
            }
        }

        Ok(())
    }

    async fn classify(
        &self,
        message: &InboundMessage,
        sender: &str,
        registry: &dyn PetRegistry,
    ) -> Result<Classification> {
        if message.subject.contains(&self.unsubscribe_marker) {
            return Ok(Classification::Unsubscribe);
        }
        if registry.exists_by_email(sender).await? {
            return Ok(Classification::Duplicate);
        }
        Ok(Classification::NewSignup)
    }
}

/// Connect to the configured mailbox and run one reconciliation pass.
pub async fn reconcile_inbox(config: &AppConfig, registry: &dyn PetRegistry) -> Result<()> {
    let alias = alias_address(&config.email_address, &config.alias_tag)?;

    let mut mailbox = ImapMailbox::connect(
        &config.imap_host,
        &config.email_address,
        &config.email_app_password,
        &config.mail_folder,
    )
    .await?;

    InboxReconciler::new(&config.unsubscribe_marker)
        .reconcile(&mut mailbox, &alias, registry)
        .await
}
