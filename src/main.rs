use clap::Parser;

use linklytics::cli::{Cli, Commands};
use linklytics::config::{get_config, init_config};
use linklytics::interfaces::cli::run_cli_command;
use linklytics::runtime::modes::run_server;
use linklytics::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_config();

    // CLI Mode
    if let Some(command) = cli.command
        && !matches!(command, Commands::Serve)
    {
        if let Err(e) = run_cli_command(command).await {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
        return Ok(());
    }

    // Server Mode
    let config = get_config();
    let _guard = init_logging(&config.logging);

    run_server().await
}
