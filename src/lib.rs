/// 10x Cards: AI-assisted flashcard service library
///
/// This library provides the core functionality for the 10x Cards
/// application: user accounts and sessions, flashcard CRUD, and AI-backed
/// flashcard generation with a review workflow.
///
/// ### Modules
///
/// - `auth`: password hashing, tokens, and the bearer-session extractor
/// - `config`: layered configuration (defaults, file, env/args)
/// - `db`: database connection management
/// - `dto`: request/response shapes and their validation rules
/// - `errors`: the API error taxonomy
/// - `handlers`: axum handlers for the REST endpoints
/// - `models`: data structures mapping to database tables
/// - `repo`: repository layer for database operations
/// - `schema`: database schema definitions
/// - `services`: the generation workflow, flashcard creation, AI client
///
/// ### Web API
///
/// The library exposes a RESTful JSON API using Axum:
///
/// - `POST /api/auth/{register,login,logout,reset-password,update-password}`
/// - `GET/POST /api/flashcards`, `PUT/DELETE /api/flashcards/{id}`
/// - `POST /api/flashcards/batch`: persist a reviewed generation batch
/// - `POST /api/generations`: generate flashcard suggestions from text

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod schema;
pub mod services;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use services::OpenRouterClient;

/// Shared state handed to every handler
pub struct AppState {
    /// The database connection pool
    pub pool: Arc<db::DbPool>,
    /// The AI client used by the generation endpoint
    pub ai: OpenRouterClient,
}

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `state` - The shared application state
///
/// ### Returns
///
/// An Axum Router configured with all routes and the state attached
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        // Account routes
        .route("/api/auth/register", post(handlers::register_handler))
        .route("/api/auth/login", post(handlers::login_handler))
        .route("/api/auth/logout", post(handlers::logout_handler))
        .route(
            "/api/auth/reset-password",
            post(handlers::reset_password_handler),
        )
        .route(
            "/api/auth/update-password",
            post(handlers::update_password_handler),
        )
        // Flashcard routes
        .route(
            "/api/flashcards",
            get(handlers::list_flashcards_handler).post(handlers::create_flashcards_handler),
        )
        .route(
            "/api/flashcards/batch",
            post(handlers::batch_flashcards_handler),
        )
        .route(
            "/api/flashcards/{id}",
            put(handlers::update_flashcard_handler).delete(handlers::delete_flashcard_handler),
        )
        // Generation routes
        .route(
            "/api/generations",
            post(handlers::create_generation_handler)
                .get(handlers::generations_method_not_allowed_handler),
        )
        .with_state(state)
}

/// Runs the embedded migrations
///
/// Applied at server startup and by every test database setup.
///
/// ### Panics
///
/// This function will panic if the migrations fail to run
pub fn run_migrations(conn: &mut diesel::SqliteConnection) {
    use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}
