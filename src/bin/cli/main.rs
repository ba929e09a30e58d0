mod client;
mod commands;
mod output;
mod state;

use clap::{Parser, Subcommand};
use client::TenxCardsClient;
use output::{OutputConfig, OutputFormat};
use std::process;
use tenx_cards::config;

/// CLI for the 10x Cards flashcard service
#[derive(Parser, Debug)]
#[clap(name = "tenx-cards-cli", about = "CLI for 10x Cards")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "TENX_CARDS_URL", global = true)]
    server_url: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs or counts)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the account and session
    #[command(subcommand)]
    Auth(commands::auth::AuthCommands),
    /// Manage flashcards
    #[command(subcommand)]
    Flashcard(commands::flashcard::FlashcardCommands),
    /// Generate suggestions from source text and review them
    Generate(commands::generate::GenerateCommand),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    // Try reading from config file
    if let Some(dir) = config::get_config_dir_path() {
        let config_path = dir.join("config.toml");
        if let Ok(update) = config::config_from_file(Some(config_path)) {
            if let Some(url) = update.server_url {
                return url;
            }
        }
    }

    "http://localhost:3000".to_string()
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    // ClientError::Request wraps reqwest errors; check for connection issues
    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!(
            "Could not connect to server. Is tenx-cards running?\n  {}",
            err_string
        );
    }

    // ClientError::Server already formats as "Server error (STATUS): message"
    // so we can return it directly
    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let client = TenxCardsClient::new(server_url, commands::auth::load_token());
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::execute(&client, cmd, &output_config).await,
        Commands::Flashcard(cmd) => {
            commands::flashcard::execute(&client, cmd, &output_config).await
        }
        Commands::Generate(cmd) => {
            commands::generate::execute(&client, cmd, &output_config).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
