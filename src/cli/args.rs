//! CLI argument definitions using clap
//!
//! Commands:
//! - restbase serve [--bind <addr>] [--port <port>] [--database <url>]
//! - restbase create-admin --name <name> --email <email> --password <password>

use clap::{Parser, Subcommand};

/// restbase - generated CRUD endpoints over a document store
#[derive(Parser, Debug)]
#[command(name = "restbase")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Interface to bind (overrides RESTBASE_BIND)
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides RESTBASE_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// SQLite database URL (overrides DATABASE_URL)
        #[arg(long)]
        database: Option<String>,
    },

    /// Create an administrator account
    CreateAdmin {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// SQLite database URL (overrides DATABASE_URL)
        #[arg(long)]
        database: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
