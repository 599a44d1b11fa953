//! Pet lifecycle: creation, removal, and expiry sweeps.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use uuid::Uuid;

use shared::models::{Pet, PetProfile};

use crate::genai::PetModel;
use crate::mail::Mailer;
use crate::services::inbox::PetRegistry;
use crate::services::templates;
use crate::store::PetStore;

pub struct PetLifecycleService {
    store: Arc<dyn PetStore>,
    mailer: Arc<dyn Mailer>,
    model: Arc<dyn PetModel>,
    lifespan_days: i64,
}

impl PetLifecycleService {
    pub fn new(
        store: Arc<dyn PetStore>,
        mailer: Arc<dyn Mailer>,
        model: Arc<dyn PetModel>,
        lifespan_days: i64,
    ) -> Self {
        Self {
            store,
            mailer,
            model,
            lifespan_days,
        }
    }

    /// Generate a persona, persist the pet, and send the welcome mail.
    /// Nothing is persisted if profile generation fails.
    pub async fn create_pet(&self, email: &str) -> Result<(Uuid, PetProfile)> {
        tracing::info!("Creating pet for: {}", email);

        let profile = self
            .model
            .generate_profile()
            .await
            .context("Failed to generate pet profile")?;

        let pet_id = self.store.insert_pet(email, &profile, Utc::now()).await?;
        tracing::info!("Pet created: {} ({})", profile.name, pet_id);

        self.mailer.send(templates::welcome(email, &profile)).await?;

        Ok((pet_id, profile))
    }

    /// Remove the pet registered to `email`, if any. Returns whether a pet
    /// was found.
    pub async fn delete_pet_by_email(&self, email: &str) -> Result<bool> {
        match self.store.find_by_email(email).await? {
            Some(pet) => {
                self.store.delete_pet(pet.id).await?;
                tracing::info!("Deleted pet {} for: {}", pet.id, email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Sweep all pets and retire the ones past their lifespan. Each pet is
    /// handled independently; one failure never blocks the rest.
    pub async fn expire_old_pets(&self) -> Result<()> {
        let pets = self.store.list_pets().await?;
        if pets.is_empty() {
            tracing::info!("No pets found");
            return Ok(());
        }

        let now = Utc::now();
        let sweeps = pets.into_iter().map(|pet| async move {
            if !pet.is_expired(now, self.lifespan_days) {
                return;
            }
            if let Err(e) = self.retire(&pet).await {
                tracing::error!("Failed to retire pet {}: {:#}", pet.id, e);
            }
        });
        join_all(sweeps).await;

        Ok(())
    }

    async fn retire(&self, pet: &Pet) -> Result<()> {
        self.store.delete_pet(pet.id).await?;
        tracing::info!("Retired expired pet: {}", pet.id);
        self.mailer.send(templates::farewell(&pet.email)).await?;
        Ok(())
    }
}

#[async_trait]
impl PetRegistry for PetLifecycleService {
    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        self.store.exists_by_email(email).await
    }

    async fn create(&self, email: &str) -> Result<()> {
        self.create_pet(email).await.map(|_| ())
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool> {
        self.delete_pet_by_email(email).await
    }

    async fn notify_unsubscribed(&self, email: &str) -> Result<()> {
        self.mailer
            .send(templates::unsubscribe_confirmation(email))
            .await
    }

    async fn notify_already_registered(&self, email: &str) -> Result<()> {
        self.mailer
            .send(templates::already_registered(email))
            .await
    }
}
