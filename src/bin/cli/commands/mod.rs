pub mod auth;
pub mod flashcard;
pub mod generate;
