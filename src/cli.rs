//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Linklytics - short links with click analytics
#[derive(Parser)]
#[command(name = "linklytics")]
#[command(version)]
#[command(about = "Short-link resolution and click-analytics service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Manage dashboard users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// User management commands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a dashboard user
    Add {
        /// Login email (stored lower-cased)
        #[arg(long)]
        email: String,

        /// Password (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Change the password of an existing user
    Passwd {
        #[arg(long)]
        email: String,

        /// New password (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["linklytics"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_user_add() {
        let cli = Cli::try_parse_from([
            "linklytics",
            "user",
            "add",
            "--email",
            "alice@example.com",
            "--stdin",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::User {
                action:
                    UserCommands::Add {
                        email,
                        password,
                        stdin,
                    },
            }) => {
                assert_eq!(email, "alice@example.com");
                assert_eq!(password, None);
                assert!(stdin);
            }
            _ => panic!("expected user add"),
        }
    }

    #[test]
    fn test_user_passwd_requires_email() {
        assert!(Cli::try_parse_from(["linklytics", "user", "passwd"]).is_err());
    }
}
