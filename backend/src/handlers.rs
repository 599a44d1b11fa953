use axum::extract::State;
use axum::Json;
use validator::Validate;

use shared::api::{
    CreatePetRequest, CreatePetResponse, GenerateDestinationRequest, GenerateDiaryRequest,
    GenerateDiaryResponse, TriggerResponse,
};
use shared::models::Destination;

use crate::error::{ApiError, ApiResult};
use crate::services::inbox::{reconcile_inbox, PetRegistry};
use crate::state::AppState;

pub async fn health_check() -> &'static str {
    "ok"
}

// ============================================================================
// Pets
// ============================================================================

pub async fn create_pet(
    State(state): State<AppState>,
    Json(payload): Json<CreatePetRequest>,
) -> ApiResult<Json<CreatePetResponse>> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    if state.pets.exists_by_email(&payload.email).await? {
        return Err(ApiError::bad_request(
            "A pet is already registered for this email",
        ));
    }

    let (pet_id, profile) = state.pets.create_pet(&payload.email).await?;
    Ok(Json(CreatePetResponse { pet_id, profile }))
}

// ============================================================================
// Callable flows
// ============================================================================

pub async fn generate_destination(
    State(state): State<AppState>,
    Json(payload): Json<GenerateDestinationRequest>,
) -> ApiResult<Json<Destination>> {
    let destination = state
        .model
        .generate_destination(&payload.persona_dna, payload.date, &payload.past_destinations)
        .await?;
    Ok(Json(destination))
}

pub async fn generate_diary(
    State(state): State<AppState>,
    Json(payload): Json<GenerateDiaryRequest>,
) -> ApiResult<Json<GenerateDiaryResponse>> {
    let page = state
        .model
        .generate_diary(&payload.persona_dna, &payload.travel_material)
        .await?;
    Ok(Json(GenerateDiaryResponse {
        diary: page.diary,
        image_prompt: page.image_prompt,
    }))
}

// ============================================================================
// Triggers
// ============================================================================

pub async fn trigger_inbox(State(state): State<AppState>) -> ApiResult<Json<TriggerResponse>> {
    reconcile_inbox(&state.config, state.pets.as_ref()).await?;
    Ok(Json(TriggerResponse {
        triggered: true,
        message: "Inbox reconciliation completed".to_string(),
    }))
}

pub async fn trigger_diaries(State(state): State<AppState>) -> ApiResult<Json<TriggerResponse>> {
    state.diary.generate_diaries_for_all_pets().await?;
    Ok(Json(TriggerResponse {
        triggered: true,
        message: "Diary generation completed".to_string(),
    }))
}

pub async fn trigger_diary_emails(
    State(state): State<AppState>,
) -> ApiResult<Json<TriggerResponse>> {
    state.diary.send_diary_emails_for_all_pets().await?;
    Ok(Json(TriggerResponse {
        triggered: true,
        message: "Diary emails sent".to_string(),
    }))
}

pub async fn trigger_expiry(State(state): State<AppState>) -> ApiResult<Json<TriggerResponse>> {
    state.pets.expire_old_pets().await?;
    Ok(Json(TriggerResponse {
        triggered: true,
        message: "Expiry sweep completed".to_string(),
    }))
}
