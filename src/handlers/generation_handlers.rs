use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::AppState;
use crate::auth::AuthUser;
use crate::dto::{CreateGenerationDto, GenerationSuggestionsResponse};
use crate::errors::ApiError;
use crate::services;

/// Handler for generating flashcard suggestions
///
/// This function handles POST requests to `/api/generations`.
///
/// ### Arguments
///
/// * `state` - The shared application state
/// * `user` - The authenticated caller
/// * `payload` - The request payload with the source text
///
/// ### Returns
///
/// The generation ID, suggestions and count as JSON; 400 when the text is
/// out of bounds, 500 for AI or persistence failures
#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_generation_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateGenerationDto>,
) -> Result<Json<GenerationSuggestionsResponse>, ApiError> {
    info!("Generation requested");

    let response =
        services::generate_suggestions(&state.pool, &state.ai, &user.id, &payload.source_text)
            .await?;

    Ok(Json(response))
}

/// Handler for unsupported GET requests to `/api/generations`
pub async fn generations_method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}
