/// Client-side state for the interactive CLI.
///
/// The review session and list manager hold the state the browser client
/// kept in its view components. Both talk to the server through the small
/// traits below, so their tests can swap the real client for a scripted
/// fake.

use tenx_cards::dto::{
    BatchFlashcardsDto, CreateFlashcardsResponse, FlashcardsListResponse, FlashcardsQueryDto,
    GenerationSuggestionsResponse, SingleFlashcardDto, UpdateFlashcardDto,
};
use tenx_cards::models::Flashcard;

use crate::client::ClientError;

/// The server operations the generation review session needs
pub trait GenerationApi {
    async fn create_generation(
        &self,
        source_text: &str,
    ) -> Result<GenerationSuggestionsResponse, ClientError>;

    async fn save_batch(
        &self,
        batch: &BatchFlashcardsDto,
    ) -> Result<CreateFlashcardsResponse, ClientError>;
}

/// The server operations the flashcards list manager needs
pub trait FlashcardsApi {
    async fn list_flashcards(
        &self,
        query: &FlashcardsQueryDto,
    ) -> Result<FlashcardsListResponse, ClientError>;

    async fn create_flashcard(
        &self,
        card: &SingleFlashcardDto,
    ) -> Result<CreateFlashcardsResponse, ClientError>;

    async fn update_flashcard(
        &self,
        id: &str,
        patch: &UpdateFlashcardDto,
    ) -> Result<Flashcard, ClientError>;

    async fn delete_flashcard(&self, id: &str) -> Result<(), ClientError>;
}

mod generation;
pub use generation::{ApiState, GenerationManager, SuggestionPatch, SuggestionStatus, SuggestionViewModel};

mod flashcards;
pub use flashcards::FlashcardsManager;

#[cfg(test)]
pub mod test_api;
