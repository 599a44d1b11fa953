// Database models for Diesel
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use shared::models::{Destination, DiaryEntry, Pet, PetProfile};

/// Database representation of a pet.
/// Structured fields are stored as JSON strings in TEXT columns.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::pets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PetRow {
    pub id: Uuid,
    pub email: String,
    pub profile: String,           // JSON stored as TEXT
    pub created_at: DateTime<Utc>,
    pub next_destination: Option<String>, // JSON stored as TEXT
    pub destinations: String,      // JSON array stored as TEXT
}

impl TryFrom<PetRow> for Pet {
    type Error = serde_json::Error;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        let profile: PetProfile = serde_json::from_str(&row.profile)?;
        let next_destination: Option<Destination> = row
            .next_destination
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let destinations: Vec<Destination> = serde_json::from_str(&row.destinations)?;

        Ok(Pet {
            id: row.id,
            email: row.email,
            profile,
            created_at: row.created_at,
            next_destination,
            destinations,
        })
    }
}

/// Insertable struct for new pets
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::pets)]
pub struct NewPet {
    pub id: Uuid,
    pub email: String,
    pub profile: String,
    pub created_at: DateTime<Utc>,
    pub next_destination: Option<String>,
    pub destinations: String,
}

/// Database representation of one diary page
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::diary_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiaryEntryRow {
    pub pet_id: Uuid,
    pub entry_date: NaiveDate,
    pub itinerary: String, // JSON stored as TEXT
    pub diary: String,
    pub image_url: Option<String>,
}

impl DiaryEntryRow {
    pub fn from_entry(pet_id: Uuid, entry: &DiaryEntry) -> Result<Self, serde_json::Error> {
        Ok(Self {
            pet_id,
            entry_date: entry.date,
            itinerary: serde_json::to_string(&entry.itinerary)?,
            diary: entry.diary.clone(),
            image_url: entry.image_url.clone(),
        })
    }
}

impl TryFrom<DiaryEntryRow> for DiaryEntry {
    type Error = serde_json::Error;

    fn try_from(row: DiaryEntryRow) -> Result<Self, Self::Error> {
        Ok(DiaryEntry {
            itinerary: serde_json::from_str(&row.itinerary)?,
            diary: row.diary,
            date: row.entry_date,
            image_url: row.image_url,
        })
    }
}
