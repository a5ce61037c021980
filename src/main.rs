//! Taskboard CLI entry point.

use anyhow::Result;
use clap::Parser;

use taskboard::cli::{commands, handle_error, App, Cli};
use taskboard::infrastructure::config::ConfigLoader;
use taskboard::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&config.logging)?;

    let app = App::build(&config)?;
    commands::dispatch(&app, cli.command, cli.json).await
}
