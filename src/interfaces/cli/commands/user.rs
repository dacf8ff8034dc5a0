//! 用户管理 CLI 命令

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::AuthService;

/// 从不同来源获取密码
fn get_password(password: Option<String>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::CommandError(format!("Failed to read from stdin: {}", e)))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    } else if let Some(pwd) = password {
        Ok(pwd)
    } else {
        prompt_password_with_confirm()
    }
}

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::ParseError(
            "No password provided. Use --password or --stdin flag, or run interactively."
                .to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
    };

    let password = read("Enter password: ")?;
    let confirm = read("Confirm password: ")?;
    if password != confirm {
        return Err(CliError::CommandError("Passwords do not match".to_string()));
    }
    Ok(password)
}

pub async fn add_user(
    auth: &AuthService,
    email: &str,
    password: Option<String>,
    stdin: bool,
) -> Result<(), CliError> {
    let password = get_password(password, stdin)?;
    let user = auth.create_user(email, &password).await?;

    println!(
        "{} User created: {} ({})",
        "✓".green().bold(),
        user.email.cyan(),
        user.id.dimmed()
    );
    Ok(())
}

pub async fn change_password(
    auth: &AuthService,
    email: &str,
    password: Option<String>,
    stdin: bool,
) -> Result<(), CliError> {
    let password = get_password(password, stdin)?;
    auth.set_password(email, &password).await?;

    println!(
        "{} Password updated for {}",
        "✓".green().bold(),
        email.trim().to_lowercase().cyan()
    );
    Ok(())
}
