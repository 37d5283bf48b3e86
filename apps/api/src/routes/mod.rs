pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ats::handlers as ats;
use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::banner_handler))
        .route("/health", get(health::health_handler))
        .route("/set-api-key", post(session::handle_set_api_key))
        .route("/analyze", post(ats::handle_analyze))
        // Generation
        .route("/tailor_resume", post(generation::handle_tailor_resume))
        .route(
            "/generate_cover_letter",
            post(generation::handle_generate_cover_letter),
        )
        .route(
            "/tailor_resume_overleaf",
            post(generation::handle_tailor_resume_extended),
        )
        .route(
            "/generate_cover_letter_overleaf",
            post(generation::handle_generate_cover_letter_extended),
        )
        // Export
        .route("/download/:format", post(export::handle_download))
        .with_state(state)
}
