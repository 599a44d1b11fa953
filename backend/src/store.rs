//! Pet registry persistence.
//!
//! The document layout mirrors the original store: a `pets` collection and a
//! per-pet diary sub-collection keyed by calendar date. Structured fields
//! live in TEXT columns as JSON strings; rows convert to the domain types in
//! `shared::models`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use shared::models::{Destination, DiaryEntry, Pet, PetProfile};

use crate::db::DbPool;
use crate::models::{DiaryEntryRow, NewPet, PetRow};
use crate::schema::{diary_entries, pets};

/// Storage operations for pet records and their diary sub-records.
#[async_trait]
pub trait PetStore: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Persist a new pet with an empty destination history. Returns the
    /// assigned pet id.
    async fn insert_pet(
        &self,
        email: &str,
        profile: &PetProfile,
        created_at: DateTime<Utc>,
    ) -> Result<Uuid>;

    async fn list_pets(&self) -> Result<Vec<Pet>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Pet>>;

    /// Hard-delete a pet and all of its diary entries.
    async fn delete_pet(&self, pet_id: Uuid) -> Result<()>;

    /// Record a newly generated destination: set `next_destination` and
    /// append to the history.
    async fn append_destination(&self, pet_id: Uuid, destination: &Destination) -> Result<()>;

    /// Insert or overwrite the diary entry for `entry.date` (last write wins).
    async fn upsert_diary_entry(&self, pet_id: Uuid, entry: &DiaryEntry) -> Result<()>;

    async fn get_diary_entry(&self, pet_id: Uuid, date: NaiveDate) -> Result<Option<DiaryEntry>>;
}

/// Postgres-backed store.
pub struct PgPetStore {
    pool: DbPool,
}

impl PgPetStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PetStore for PgPetStore {
    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let mut conn = self.pool.get().await?;

        let found: Option<Uuid> = pets::table
            .filter(pets::email.eq(email))
            .select(pets::id)
            .first(&mut conn)
            .await
            .optional()
            .context("Failed to look up pet by email")?;

        Ok(found.is_some())
    }

    async fn insert_pet(
        &self,
        email: &str,
        profile: &PetProfile,
        created_at: DateTime<Utc>,
    ) -> Result<Uuid> {
        let mut conn = self.pool.get().await?;

        let row = NewPet {
            id: Uuid::new_v4(),
            email: email.to_string(),
            profile: serde_json::to_string(profile)?,
            created_at,
            next_destination: None,
            destinations: "[]".to_string(),
        };

        diesel::insert_into(pets::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .context("Failed to insert pet")?;

        Ok(row.id)
    }

    async fn list_pets(&self) -> Result<Vec<Pet>> {
        let mut conn = self.pool.get().await?;

        let rows = pets::table
            .order_by(pets::created_at.asc())
            .select(PetRow::as_select())
            .load::<PetRow>(&mut conn)
            .await
            .context("Failed to load pets")?;

        rows.into_iter()
            .map(|row| Pet::try_from(row).context("Malformed pet document"))
            .collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Pet>> {
        let mut conn = self.pool.get().await?;

        let row: Option<PetRow> = pets::table
            .filter(pets::email.eq(email))
            .select(PetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .context("Failed to look up pet by email")?;

        row.map(|row| Pet::try_from(row).context("Malformed pet document"))
            .transpose()
    }

    async fn delete_pet(&self, pet_id: Uuid) -> Result<()> {
        let mut conn = self.pool.get().await?;

        // Diary sub-records first, then the pet record itself.
        diesel::delete(diary_entries::table.filter(diary_entries::pet_id.eq(pet_id)))
            .execute(&mut conn)
            .await
            .context("Failed to delete diary entries")?;

        diesel::delete(pets::table.find(pet_id))
            .execute(&mut conn)
            .await
            .context("Failed to delete pet")?;

        Ok(())
    }

    async fn append_destination(&self, pet_id: Uuid, destination: &Destination) -> Result<()> {
        let mut conn = self.pool.get().await?;

        let current: String = pets::table
            .find(pet_id)
            .select(pets::destinations)
            .first(&mut conn)
            .await
            .context("Failed to load destination history")?;

        let mut history: Vec<Destination> =
            serde_json::from_str(&current).context("Malformed destination history")?;
        history.push(destination.clone());

        diesel::update(pets::table.find(pet_id))
            .set((
                pets::next_destination.eq(Some(serde_json::to_string(destination)?)),
                pets::destinations.eq(serde_json::to_string(&history)?),
            ))
            .execute(&mut conn)
            .await
            .context("Failed to save destination")?;

        Ok(())
    }

    async fn upsert_diary_entry(&self, pet_id: Uuid, entry: &DiaryEntry) -> Result<()> {
        let mut conn = self.pool.get().await?;

        let row = DiaryEntryRow::from_entry(pet_id, entry)?;

        diesel::insert_into(diary_entries::table)
            .values(&row)
            .on_conflict((diary_entries::pet_id, diary_entries::entry_date))
            .do_update()
            .set((
                diary_entries::itinerary.eq(excluded(diary_entries::itinerary)),
                diary_entries::diary.eq(excluded(diary_entries::diary)),
                diary_entries::image_url.eq(excluded(diary_entries::image_url)),
            ))
            .execute(&mut conn)
            .await
            .context("Failed to save diary entry")?;

        Ok(())
    }

    async fn get_diary_entry(&self, pet_id: Uuid, date: NaiveDate) -> Result<Option<DiaryEntry>> {
        let mut conn = self.pool.get().await?;

        let row: Option<DiaryEntryRow> = diary_entries::table
            .find((pet_id, date))
            .select(DiaryEntryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .context("Failed to load diary entry")?;

        row.map(|row| DiaryEntry::try_from(row).context("Malformed diary entry"))
            .transpose()
    }
}
