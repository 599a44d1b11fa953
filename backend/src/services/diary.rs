//! Daily diary cycle: pick a destination, write the entry, render the
//! illustration, persist, and mail.

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;

use shared::models::{DiaryEntry, Pet};

use crate::genai::PetModel;
use crate::mail::Mailer;
use crate::services::templates;
use crate::store::PetStore;

pub struct DiaryService {
    store: Arc<dyn PetStore>,
    mailer: Arc<dyn Mailer>,
    model: Arc<dyn PetModel>,
}

impl DiaryService {
    pub fn new(store: Arc<dyn PetStore>, mailer: Arc<dyn Mailer>, model: Arc<dyn PetModel>) -> Self {
        Self {
            store,
            mailer,
            model,
        }
    }

    /// Run today's diary cycle for every live pet. Pets are handled
    /// independently; one failure never blocks the rest.
    pub async fn generate_diaries_for_all_pets(&self) -> Result<()> {
        let pets = self.store.list_pets().await?;
        if pets.is_empty() {
            tracing::info!("No pets found");
            return Ok(());
        }

        tracing::info!("Generating diaries for {} pets", pets.len());
        let runs = pets.iter().map(|pet| async move {
            if let Err(e) = self.generate_for_pet(pet).await {
                tracing::error!("Failed to generate diary for pet {}: {:#}", pet.id, e);
            }
        });
        join_all(runs).await;

        tracing::info!("Diary generation completed");
        Ok(())
    }

    async fn generate_for_pet(&self, pet: &Pet) -> Result<()> {
        let today = Utc::now().date_naive();

        let destination = self
            .model
            .generate_destination(&pet.profile.persona_dna, today, &pet.destinations)
            .await?;
        self.store.append_destination(pet.id, &destination).await?;

        let page = self
            .model
            .generate_diary(&pet.profile.persona_dna, &destination)
            .await?;

        // A missing illustration degrades the entry to text-only.
        let image_url = match self.model.generate_image(&page.image_prompt).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Image generation failed for pet {}: {:#}", pet.id, e);
                None
            }
        };

        let entry = DiaryEntry {
            itinerary: destination,
            diary: page.diary,
            date: today,
            image_url,
        };
        self.store.upsert_diary_entry(pet.id, &entry).await?;

        self.mailer.send(templates::diary(&pet.email, &entry)).await?;
        tracing::info!("Diary delivered for pet: {}", pet.id);

        Ok(())
    }

    /// Re-send today's stored diary entries without regenerating anything.
    /// Pets without an entry for today are skipped with a warning.
    pub async fn send_diary_emails_for_all_pets(&self) -> Result<()> {
        let pets = self.store.list_pets().await?;
        if pets.is_empty() {
            tracing::info!("No pets found");
            return Ok(());
        }

        let today = Utc::now().date_naive();
        let runs = pets.iter().map(|pet| async move {
            if let Err(e) = self.resend_for_pet(pet, today).await {
                tracing::error!("Failed to send diary email for pet {}: {:#}", pet.id, e);
            }
        });
        join_all(runs).await;

        Ok(())
    }

    async fn resend_for_pet(&self, pet: &Pet, date: NaiveDate) -> Result<()> {
        let Some(entry) = self.store.get_diary_entry(pet.id, date).await? else {
            tracing::warn!("No diary entry today for pet: {}", pet.id);
            return Ok(());
        };
        self.mailer.send(templates::diary(&pet.email, &entry)).await
    }
}
