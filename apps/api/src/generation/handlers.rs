//! Axum route handlers for the generation API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::generation::generator::{
    self, CoverLetterRequest, CoverLetterResponse, ExtendedCoverLetterRequest,
    ExtendedCoverLetterResponse, ExtendedTailorRequest, ExtendedTailorResponse,
    TailorResumeRequest, TailorResumeResponse,
};
use crate::llm_client::{CompletionClient, GeminiClient};
use crate::state::AppState;

/// The session's client, if a key has been stored. Pipelines decide whether they need it.
async fn session_client(state: &AppState) -> Option<GeminiClient> {
    state
        .session
        .client(state.http.clone(), &state.config.gemini_model)
        .await
        .ok()
}

fn as_completion(client: &Option<GeminiClient>) -> Option<&dyn CompletionClient> {
    client.as_ref().map(|c| c as &dyn CompletionClient)
}

/// POST /tailor_resume
///
/// Tailors the single-column resume. A `resume_data` record skips the model call.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Json(request): Json<TailorResumeRequest>,
) -> Result<Json<TailorResumeResponse>, AppError> {
    let client = session_client(&state).await;
    let response =
        generator::tailor_resume(as_completion(&client), &state.templates, &state.compiler, request)
            .await?;
    Ok(Json(response))
}

/// POST /generate_cover_letter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let client = session_client(&state).await;
    let response = generator::generate_cover_letter(
        as_completion(&client),
        &state.templates,
        &state.compiler,
        request,
    )
    .await?;
    Ok(Json(response))
}

/// POST /tailor_resume_overleaf
///
/// Two-column single-page resume with before/after keyword scores.
/// `fast: true` renders with the built-in writer only.
pub async fn handle_tailor_resume_extended(
    State(state): State<AppState>,
    Json(request): Json<ExtendedTailorRequest>,
) -> Result<Json<ExtendedTailorResponse>, AppError> {
    let client = session_client(&state).await;
    let response = generator::tailor_resume_extended(
        as_completion(&client),
        &state.templates,
        &state.compiler,
        request,
    )
    .await?;
    Ok(Json(response))
}

/// POST /generate_cover_letter_overleaf
pub async fn handle_generate_cover_letter_extended(
    State(state): State<AppState>,
    Json(request): Json<ExtendedCoverLetterRequest>,
) -> Result<Json<ExtendedCoverLetterResponse>, AppError> {
    let client = session_client(&state).await;
    let response = generator::generate_cover_letter_extended(
        as_completion(&client),
        &state.templates,
        &state.compiler,
        request,
    )
    .await?;
    Ok(Json(response))
}
