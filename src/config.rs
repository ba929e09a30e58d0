use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use toml;
use tracing::{info, warn};

/// Configuration for the 10x Cards server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// OpenRouter API key; absent selects the mock AI client
    pub openrouter_api_key: Option<String>,
    /// Model identifier passed to OpenRouter
    pub openrouter_model: Option<String>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    /// Optional update for database URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional update for the listen port
    #[serde(default)]
    pub port: Option<u16>,
    /// Optional update for the OpenRouter API key
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
    /// Optional update for the OpenRouter model
    #[serde(default)]
    pub openrouter_model: Option<String>,
    /// Server URL for the CLI; the server itself ignores this key
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug)]
#[clap(name = "tenx-cards", about = "AI-assisted flashcard service")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Port to listen on
    #[clap(long, env = "TENX_CARDS_PORT")]
    pub port: Option<u16>,

    /// OpenRouter API key; omit to run the AI client in mock mode
    #[clap(long, env = "OPENROUTER_API_KEY")]
    pub openrouter_api_key: Option<String>,

    /// OpenRouter model identifier
    #[clap(long, env = "OPENROUTER_MODEL")]
    pub openrouter_model: Option<String>,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            port: update.port.unwrap_or(self.port),
            openrouter_api_key: update.openrouter_api_key.or(self.openrouter_api_key),
            openrouter_model: update.openrouter_model.or(self.openrouter_model),
        }
    }
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("tenx_cards.db".to_string(), |path| {
        path.join("tenx_cards.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        port: 3000,
        openrouter_api_key: None,
        openrouter_model: None,
    }
}

/// Returns the XDG config directory for this application, if resolvable
pub fn get_config_dir_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "tenx-cards", "tenx-cards")
        .map(|dirs| PathBuf::from(dirs.config_dir()))
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    // If the config path is None, return the default config
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        port: args.port,
        openrouter_api_key: args.openrouter_api_key,
        openrouter_model: args.openrouter_model,
        server_url: None,
    }
}

/// Gets the complete configuration by combining defaults with values from
/// the config file, environment variables, and command line arguments in
/// order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let config_dir = get_config_dir_path().or_else(|| {
        warn!("Could not determine XDG config directory, skipping config file");
        None
    });

    let config_file = config_dir.as_ref().map(|dir| dir.join("config.toml"));

    let base = base_config(config_dir);

    // Apply updates in order of increasing precedence
    let config = base
        .apply_update(config_from_file(config_file).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, port={}, ai={}",
        config.database_url,
        config.port,
        if config.openrouter_api_key.is_some() {
            config
                .openrouter_model
                .as_deref()
                .unwrap_or("openai/gpt-4o-mini")
        } else {
            "mock"
        }
    );

    config
}
