//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::schedule::ScheduleArgs;

#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(about = "Taskboard - residency schedule dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Read configuration from this file instead of .taskboard/
    #[arg(short, long, global = true, env = "TASKBOARD_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exchange an identity-provider token for a session
    Login {
        /// ID token issued by the identity provider
        #[arg(long, env = "TASKBOARD_ID_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Discard the stored session
    Logout,

    /// Show the signed-in user and the pages they may open
    Whoami,

    /// Trade the stored credential for a fresh one
    Refresh,

    /// Check whether the signed-in user may open a route
    Access {
        /// Route path, e.g. /master
        route: String,
    },

    /// Show scheduled tasks for a period, grouped by department
    Schedule(ScheduleArgs),

    /// List the departments known to the task master
    Departments,

    /// List the frequencies known to the task master
    Frequencies,
}
