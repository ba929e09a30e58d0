use clap::Args;
use std::fs;
use std::io::{self, BufRead, Write};

use crate::client::TenxCardsClient;
use crate::output::{self, OutputConfig};
use crate::state::{ApiState, GenerationManager, SuggestionPatch, SuggestionStatus};

/// Generate flashcard suggestions from source text and review them
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// File with the source text, or "-" to read stdin
    pub input: String,
}

fn read_source_text(input: &str) -> Result<String, Box<dyn std::error::Error>> {
    if input == "-" {
        let mut text = String::new();
        io::Read::read_to_string(&mut io::stdin(), &mut text)?;
        Ok(text)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// Resolves a 1-based index typed by the user to a suggestion id
fn suggestion_id(manager: &GenerationManager, index_arg: Option<&str>) -> Option<String> {
    let index: usize = index_arg?.parse().ok()?;
    manager
        .suggestions()
        .get(index.checked_sub(1)?)
        .map(|s| s.id.clone())
}

fn prompt(label: &str) -> Result<String, Box<dyn std::error::Error>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Executes the generate command: one AI call, then an interactive review
/// loop until the batch is saved or discarded.
pub async fn execute(
    client: &TenxCardsClient,
    cmd: GenerateCommand,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let source_text = read_source_text(&cmd.input)?;

    let mut manager = GenerationManager::new();
    output::print_message("Generating suggestions...", config);
    manager.handle_generate(client, source_text.trim()).await;

    if manager.api_state() == ApiState::Error {
        return Err(manager
            .error_message()
            .unwrap_or("Generation failed.")
            .into());
    }

    if let Some(generation_id) = manager.generation_id() {
        output::print_message(
            &format!(
                "Generation {} returned {} suggestions.",
                generation_id,
                manager.suggestions().len()
            ),
            config,
        );
    }
    output::print_suggestions(manager.suggestions(), config);
    output::print_message(
        "Commands: accept <n> | reject <n> | edit <n> | list | save | quit",
        config,
    );

    loop {
        let line = prompt("> ")?;
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("");
        let argument = words.next();

        match command {
            "accept" | "reject" => {
                let Some(id) = suggestion_id(&manager, argument) else {
                    output::print_message("No such suggestion.", config);
                    continue;
                };
                let status = if command == "accept" {
                    SuggestionStatus::Accepted
                } else {
                    SuggestionStatus::Rejected
                };
                manager.handle_update_suggestion(
                    &id,
                    SuggestionPatch {
                        status: Some(status),
                        ..Default::default()
                    },
                );
            }
            "edit" => {
                let Some(id) = suggestion_id(&manager, argument) else {
                    output::print_message("No such suggestion.", config);
                    continue;
                };
                let front = prompt("front> ")?;
                let back = prompt("back> ")?;
                manager.handle_update_suggestion(
                    &id,
                    SuggestionPatch {
                        front: (!front.is_empty()).then_some(front),
                        back: (!back.is_empty()).then_some(back),
                        status: Some(SuggestionStatus::Edited),
                    },
                );
            }
            "list" => output::print_suggestions(manager.suggestions(), config),
            "save" => {
                manager.handle_save_batch(client).await;
                if let Some(error) = manager.save_error() {
                    // The session is intact; the user can retry or keep reviewing
                    output::print_message(&format!("Save failed: {}", error), config);
                    continue;
                }
                output::print_message("Flashcards saved.", config);
                return Ok(());
            }
            "quit" => {
                output::print_message("Discarding review session.", config);
                return Ok(());
            }
            "" => continue,
            other => {
                output::print_message(&format!("Unknown command '{}'.", other), config);
            }
        }
    }
}
