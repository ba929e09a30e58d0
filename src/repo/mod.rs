/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for interacting with the database: users and
/// sessions, flashcards, and generation records.
///
/// The repository pattern abstracts away the details of database access
/// and provides a clean API for the rest of the application to use.

mod user_repo;
mod session_repo;
mod flashcard_repo;
mod generation_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use session_repo::*;
pub use flashcard_repo::*;
pub use generation_repo::*;
