//! Axum route handlers for the session credential.

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetApiKeyForm {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct SetApiKeyResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// POST /set-api-key
///
/// Stores the key without validating it against the provider; a bad key
/// surfaces on the first completion call instead.
pub async fn handle_set_api_key(
    State(state): State<AppState>,
    Form(form): Form<SetApiKeyForm>,
) -> Result<Json<SetApiKeyResponse>, AppError> {
    state.session.set_api_key(&form.api_key).await?;
    info!("API key stored for this process");
    Ok(Json(SetApiKeyResponse {
        status: "success",
        message: "API key stored",
    }))
}
