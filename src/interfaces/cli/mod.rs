//! CLI interface module
//!
//! User management and config generation, run without the HTTP server.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands, UserCommands};
use crate::services::AuthService;
use crate::storage::StorageFactory;
use commands::{add_user, change_password, config_generate};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::LinklyticsError> for CliError {
    fn from(err: crate::errors::LinklyticsError) -> Self {
        CliError::CommandError(err.to_string())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::User { action } => {
            let storage = StorageFactory::create()
                .await
                .map_err(|e| CliError::StorageError(e.to_string()))?;
            let auth = AuthService::new(storage);

            match action {
                UserCommands::Add {
                    email,
                    password,
                    stdin,
                } => add_user(&auth, &email, password, stdin).await,
                UserCommands::Passwd {
                    email,
                    password,
                    stdin,
                } => change_password(&auth, &email, password, stdin).await,
            }
        }

        Commands::Serve => Err(CliError::ParseError(
            "serve is handled by the server mode".to_string(),
        )),
    }
}
