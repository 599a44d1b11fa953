use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/pets", post(handlers::create_pet))
        .route("/flows/destination", post(handlers::generate_destination))
        .route("/flows/diary", post(handlers::generate_diary))
        .route("/triggers/inbox", post(handlers::trigger_inbox))
        .route("/triggers/diaries", post(handlers::trigger_diaries))
        .route("/triggers/diary-emails", post(handlers::trigger_diary_emails))
        .route("/triggers/expiry", post(handlers::trigger_expiry))
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
