use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Destination, PersonaDna, PetProfile};

// ============================================================================
// Pet API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePetResponse {
    pub pet_id: Uuid,
    pub profile: PetProfile,
}

// ============================================================================
// Callable Flow Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateDestinationRequest {
    pub persona_dna: PersonaDna,
    pub date: NaiveDate,
    #[serde(default)]
    pub past_destinations: Vec<Destination>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateDiaryRequest {
    pub persona_dna: PersonaDna,
    pub travel_material: Destination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateDiaryResponse {
    pub diary: String,
    pub image_prompt: String,
}

// ============================================================================
// Trigger Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub triggered: bool,
    pub message: String,
}
