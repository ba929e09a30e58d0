use clap::Subcommand;
use tenx_cards::dto::{SingleFlashcardDto, SortKey, SortOrder, UpdateFlashcardDto};
use tenx_cards::models::FlashcardSource;

use crate::client::TenxCardsClient;
use crate::output::{self, OutputConfig};
use crate::state::FlashcardsManager;

/// Flashcard management commands
#[derive(Subcommand, Debug)]
pub enum FlashcardCommands {
    /// List flashcards
    List {
        /// Page to fetch (1-based)
        #[clap(long, default_value_t = 1)]
        page: i64,
        /// Cards per page
        #[clap(long, default_value_t = 10)]
        limit: i64,
        /// Sort column: created_at or updated_at
        #[clap(long, default_value = "created_at")]
        sort: String,
        /// Sort direction: asc or desc
        #[clap(long, default_value = "desc")]
        order: String,
        /// Filter by source: manual, ai-full or ai-edited
        #[clap(long)]
        source: Option<String>,
    },
    /// Create a manual flashcard
    Create {
        /// The question side
        #[clap(long)]
        front: String,
        /// The answer side
        #[clap(long)]
        back: String,
    },
    /// Update a flashcard's text
    Update {
        /// The flashcard ID
        id: String,
        /// New question side
        #[clap(long)]
        front: Option<String>,
        /// New answer side
        #[clap(long)]
        back: Option<String>,
    },
    /// Delete a flashcard
    Delete {
        /// The flashcard ID
        id: String,
    },
}

fn parse_sort(sort: &str) -> Result<SortKey, String> {
    match sort {
        "created_at" => Ok(SortKey::CreatedAt),
        "updated_at" => Ok(SortKey::UpdatedAt),
        other => Err(format!(
            "Unknown sort column '{}', expected created_at or updated_at",
            other
        )),
    }
}

fn parse_order(order: &str) -> Result<SortOrder, String> {
    match order {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(format!("Unknown order '{}', expected asc or desc", other)),
    }
}

fn parse_source(source: &str) -> Result<FlashcardSource, String> {
    FlashcardSource::parse(source).ok_or_else(|| {
        format!(
            "Unknown source '{}', expected manual, ai-full or ai-edited",
            source
        )
    })
}

/// Executes a flashcard command
pub async fn execute(
    client: &TenxCardsClient,
    cmd: FlashcardCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = FlashcardsManager::new();

    match cmd {
        FlashcardCommands::List {
            page,
            limit,
            sort,
            order,
            source,
        } => {
            manager.set_sorting(parse_sort(&sort)?, parse_order(&order)?);
            manager.set_filter(source.as_deref().map(parse_source).transpose()?);
            manager.set_limit(limit);
            manager.set_page(page);
            manager.fetch(client).await;

            if let Some(error) = manager.error() {
                return Err(error.into());
            }
            output::print_flashcards(manager.flashcards(), &manager.pagination(), config);
        }
        FlashcardCommands::Create { front, back } => {
            manager
                .create_flashcard(
                    client,
                    &SingleFlashcardDto {
                        front,
                        back,
                        source: None,
                        generation_id: None,
                    },
                )
                .await?;
            output::print_message("Flashcard created.", config);
            output::print_flashcards(manager.flashcards(), &manager.pagination(), config);
        }
        FlashcardCommands::Update { id, front, back } => {
            let updated = manager
                .update_flashcard(client, &id, &UpdateFlashcardDto { front, back })
                .await?;
            output::print_flashcard(&updated, config);
        }
        FlashcardCommands::Delete { id } => {
            manager.delete_flashcard(client, &id).await?;
            output::print_message("Flashcard deleted.", config);
        }
    }
    Ok(())
}
