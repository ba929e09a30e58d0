use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::AppState;
use crate::auth::AuthUser;
use crate::dto::{
    CreateFlashcardsRequest, CreateFlashcardsResponse, FlashcardsListResponse, FlashcardsQueryDto,
    Pagination, UpdateFlashcardDto,
};
use crate::errors::ApiError;
use crate::models::Flashcard;
use crate::repo;
use crate::services;

/// Handler for listing a user's flashcards
///
/// This function handles GET requests to `/api/flashcards`.
///
/// ### Arguments
///
/// * `state` - The shared application state
/// * `user` - The authenticated caller
/// * `query` - Filter, sort and pagination parameters
///
/// ### Returns
///
/// One page of flashcards plus pagination metadata as JSON
#[instrument(skip(state, user, query), fields(user_id = %user.id))]
pub async fn list_flashcards_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<FlashcardsQueryDto>,
) -> Result<Json<FlashcardsListResponse>, ApiError> {
    debug!("Listing flashcards with filters: {:?}", query);

    let query = query.normalized();
    let (data, total_items) = repo::list_flashcards(&state.pool, &user.id, &query)?;

    info!("Retrieved {} of {} flashcards", data.len(), total_items);

    Ok(Json(FlashcardsListResponse {
        pagination: Pagination::for_page(&query, total_items),
        data,
    }))
}

/// Handler for creating flashcards, single or batch
///
/// This function handles POST requests to `/api/flashcards`. The payload is
/// either one card (manual or AI-sourced) or a reviewed generation batch,
/// discriminated by the presence of `acceptedCards`.
///
/// ### Returns
///
/// The created flashcards as JSON with a 201 status
#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_flashcards_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateFlashcardsRequest>,
) -> Result<(StatusCode, Json<CreateFlashcardsResponse>), ApiError> {
    info!("Creating flashcards");

    let flashcards = services::create_flashcards(&state.pool, payload, &user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateFlashcardsResponse { flashcards }),
    ))
}

/// Handler for persisting a reviewed generation batch
///
/// This function handles POST requests to `/api/flashcards/batch`. It is the
/// batch-only form of `create_flashcards_handler`, kept as its own route for
/// the review workflow.
#[instrument(skip(state, user, payload), fields(user_id = %user.id, generation_id = %payload.generation_id))]
pub async fn batch_flashcards_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<crate::dto::BatchFlashcardsDto>,
) -> Result<(StatusCode, Json<CreateFlashcardsResponse>), ApiError> {
    info!("Saving reviewed batch");

    let flashcards = services::create_flashcards(
        &state.pool,
        CreateFlashcardsRequest::Batch(payload),
        &user.id,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreateFlashcardsResponse { flashcards }),
    ))
}

/// Handler for updating a flashcard's text
///
/// This function handles PUT requests to `/api/flashcards/{id}`. A card
/// owned by someone else behaves exactly like a missing one.
///
/// ### Returns
///
/// The updated flashcard as JSON
#[instrument(skip(state, user, payload), fields(user_id = %user.id, flashcard_id = %id))]
pub async fn update_flashcard_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFlashcardDto>,
) -> Result<Json<Flashcard>, ApiError> {
    info!("Updating flashcard");

    payload.validate().map_err(ApiError::Validation)?;

    let updated = repo::update_flashcard(&state.pool, &user.id, &id, payload.front, payload.back)?
        .ok_or_else(|| ApiError::NotFound("Flashcard not found.".to_string()))?;

    Ok(Json(updated))
}

/// Handler for deleting a flashcard
///
/// This function handles DELETE requests to `/api/flashcards/{id}`.
///
/// ### Returns
///
/// 204 No Content on success; 404 when the card is missing or not owned
#[instrument(skip(state, user), fields(user_id = %user.id, flashcard_id = %id))]
pub async fn delete_flashcard_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting flashcard");

    let deleted = repo::delete_flashcard(&state.pool, &user.id, &id)?;
    if !deleted {
        return Err(ApiError::NotFound("Flashcard not found.".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
