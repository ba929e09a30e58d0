/// Services module
///
/// Business logic that sits between the HTTP handlers and the repository
/// layer: the AI client, the generation workflow, and flashcard creation
/// with its single/batch normalization.

pub mod openrouter;
pub mod generation;
pub mod flashcard;

pub use openrouter::{AiError, GeneratedCard, OpenRouterClient};
pub use generation::{GenerationError, generate_suggestions};
pub use flashcard::create_flashcards;
