use clap::Subcommand;
use std::fs;
use tenx_cards::config;
use tenx_cards::dto::{
    LoginDto, RegisterDto, ResetPasswordDto, UpdatePasswordDto,
};

use crate::client::TenxCardsClient;
use crate::output::{self, OutputConfig};

/// Account management commands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Register a new account
    Register {
        /// Email address
        #[clap(long)]
        email: String,
        /// Password (at least 8 characters)
        #[clap(long)]
        password: String,
    },
    /// Log in and store the bearer token
    Login {
        /// Email address
        #[clap(long)]
        email: String,
        /// Password
        #[clap(long)]
        password: String,
    },
    /// Log out and forget the stored token
    Logout,
    /// Request a password reset token
    ResetPassword {
        /// Email address of the account
        #[clap(long)]
        email: String,
    },
    /// Set a new password using a reset token or the current session
    UpdatePassword {
        /// Reset token from the reset-password flow; omit when logged in
        #[clap(long)]
        reset_token: Option<String>,
        /// The new password (at least 8 characters)
        #[clap(long)]
        password: String,
    },
}

/// Path of the file holding the stored bearer token
fn credentials_path() -> Option<std::path::PathBuf> {
    config::get_config_dir_path().map(|dir| dir.join("credentials"))
}

/// Loads the stored bearer token, if the user is logged in
pub fn load_token() -> Option<String> {
    let path = credentials_path()?;
    let token = fs::read_to_string(path).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}

fn store_token(token: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = credentials_path().ok_or("Could not determine config directory")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token)?;
    Ok(())
}

fn forget_token() {
    if let Some(path) = credentials_path() {
        let _ = fs::remove_file(path);
    }
}

/// Executes an auth command
pub async fn execute(
    client: &TenxCardsClient,
    cmd: AuthCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        AuthCommands::Register { email, password } => {
            let dto = RegisterDto {
                email,
                confirm_password: password.clone(),
                password,
            };
            // Same checks the server runs, surfaced before any request
            dto.validate()?;
            let response = client.register(&dto).await?;
            output::print_user(&response.user, config);
            output::print_message("Registered. Log in to get a session token.", config);
        }
        AuthCommands::Login { email, password } => {
            let dto = LoginDto { email, password };
            dto.validate()?;
            let response = client.login(&dto).await?;
            store_token(&response.token)?;
            output::print_user(&response.user, config);
            output::print_message("Logged in.", config);
        }
        AuthCommands::Logout => {
            let result = client.logout().await;
            // Forget the local token even when the server-side revoke failed
            forget_token();
            result?;
            output::print_message("Logged out.", config);
        }
        AuthCommands::ResetPassword { email } => {
            let dto = ResetPasswordDto { email };
            dto.validate()?;
            client.reset_password(&dto).await?;
            output::print_message(
                "If that account exists, a reset token has been issued.",
                config,
            );
        }
        AuthCommands::UpdatePassword {
            reset_token,
            password,
        } => {
            let dto = UpdatePasswordDto {
                reset_token,
                confirm_password: password.clone(),
                password,
            };
            dto.validate()?;
            client.update_password(&dto).await?;
            // Every session was revoked server-side, including this one
            forget_token();
            output::print_message("Password updated. Log in again.", config);
        }
    }
    Ok(())
}
