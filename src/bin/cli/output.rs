use clap::ValueEnum;
use tenx_cards::dto::Pagination;
use tenx_cards::models::{Flashcard, User};

use crate::state::{SuggestionStatus, SuggestionViewModel};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or counts)
    pub quiet: bool,
}

/// Prints a page of flashcards with its pagination footer
pub fn print_flashcards(cards: &[Flashcard], pagination: &Pagination, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if cards.is_empty() {
                if !config.quiet {
                    println!("No flashcards found.");
                }
                return;
            }
            if config.quiet {
                for card in cards {
                    println!("{}", card.get_id());
                }
                return;
            }
            let max_id = cards.iter().map(|c| c.get_id().len()).max().unwrap_or(2);
            println!("{:<width$}  {:<9}  FRONT", "ID", "SOURCE", width = max_id);
            for card in cards {
                println!(
                    "{:<width$}  {:<9}  {}",
                    card.get_id(),
                    card.get_source().as_str(),
                    truncate(&card.get_front(), 60),
                    width = max_id
                );
            }
            println!(
                "Page {}/{} ({} cards)",
                pagination.page, pagination.total_pages, pagination.total_items
            );
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "data": cards,
                "pagination": pagination,
            });
            println!("{}", serde_json::to_string_pretty(&value).unwrap());
        }
    }
}

/// Prints a single flashcard
pub fn print_flashcard(card: &Flashcard, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", card.get_id());
                return;
            }
            println!("ID:      {}", card.get_id());
            println!("Front:   {}", card.get_front());
            println!("Back:    {}", card.get_back());
            println!("Source:  {}", card.get_source());
            if let Some(generation_id) = card.get_generation_id() {
                println!("Gen:     {}", generation_id);
            }
            println!("Created: {}", card.get_created_at());
            println!("Updated: {}", card.get_updated_at());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(card).unwrap());
        }
    }
}

/// Prints the suggestions of a review session with their index and status
pub fn print_suggestions(suggestions: &[SuggestionViewModel], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if suggestions.is_empty() {
                if !config.quiet {
                    println!("No suggestions pending.");
                }
                return;
            }
            for (index, suggestion) in suggestions.iter().enumerate() {
                let status = match suggestion.status {
                    SuggestionStatus::New => "new",
                    SuggestionStatus::Accepted => "accepted",
                    SuggestionStatus::Edited => "edited",
                    SuggestionStatus::Rejected => "rejected",
                };
                println!("[{}] ({})", index + 1, status);
                println!("    Q: {}", suggestion.front);
                println!("    A: {}", suggestion.back);
            }
        }
        OutputFormat::Json => {
            let value: Vec<serde_json::Value> = suggestions
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.id,
                        "front": s.front,
                        "back": s.back,
                        "status": format!("{:?}", s.status).to_lowercase(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&value).unwrap());
        }
    }
}

/// Prints the logged-in (or registered) user
pub fn print_user(user: &User, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", user.get_id());
                return;
            }
            println!("ID:    {}", user.get_id());
            println!("Email: {}", user.get_email());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(user).unwrap());
        }
    }
}

/// Prints a bare confirmation line, suppressed in quiet mode
pub fn print_message(message: &str, config: &OutputConfig) {
    if !config.quiet {
        println!("{}", message);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
