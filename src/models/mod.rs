/// Data models module
///
/// This module defines the core data structures used throughout the
/// application. It includes database models that map to database tables, as
/// well as methods for creating and manipulating these models.

// Re-export all model types
mod json_value;
pub use json_value::JsonValue;

mod user;
pub use user::User;

mod session;
pub use session::Session;

mod reset_token;
pub use reset_token::PasswordResetToken;

mod flashcard;
pub use flashcard::{Flashcard, FlashcardSource};

mod generation;
pub use generation::Generation;

mod generation_error_log;
pub use generation_error_log::GenerationErrorLog;
