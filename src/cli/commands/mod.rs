//! CLI command implementations.

pub mod auth;
pub mod catalog;
pub mod schedule;

use anyhow::Result;

use crate::cli::app::App;
use crate::cli::types::Commands;

/// Run one parsed command against `app`.
pub async fn dispatch(app: &App, command: Commands, json_mode: bool) -> Result<()> {
    match command {
        Commands::Login { token } => auth::login(app, &token, json_mode).await,
        Commands::Logout => {
            auth::logout(app, json_mode);
            Ok(())
        }
        Commands::Whoami => {
            auth::whoami(app, json_mode).await;
            Ok(())
        }
        Commands::Refresh => auth::refresh(app, json_mode).await,
        Commands::Access { route } => {
            auth::access(app, route, json_mode).await;
            Ok(())
        }
        Commands::Schedule(args) => schedule::execute(app, args, json_mode).await,
        Commands::Departments => catalog::departments(app, json_mode).await,
        Commands::Frequencies => catalog::frequencies(app, json_mode).await,
    }
}
