//! CLI module
//!
//! Provides the command-line interface:
//! - serve: start the HTTP server
//! - create-admin: create an administrator account

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{create_admin, run_command, serve};
pub use errors::{CliError, CliResult};

use tracing_subscriber::EnvFilter;

/// Parse arguments, initialize logging, and dispatch
pub async fn run() -> CliResult<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse_args();
    run_command(cli.command).await
}
