//! `credseal` — binary entry point.
//!
//! One binary, two jobs, matching how the tool is deployed:
//! - `credseal run` starts the capsule HTTP server that hands sealed
//!   credentials to the browser-side autofill client.
//! - The remaining subcommands (`create`, `list`, `peek`, `remove`) manage
//!   the credential store from the terminal.

mod commands;
mod config;
mod credential;
mod server;
mod store;
mod telemetry;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "credseal")]
#[command(about = "Serve and manage sealed credentials", version)]
struct Cli {
    /// Path to the credential store file.
    #[arg(long, value_name = "FILE", default_value = "./credentials.json")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the capsule HTTP server (settings come from CREDSEAL_* env vars).
    Run,
    /// Insert a new credential, prompting for any missing field.
    Create {
        /// User name of the credential.
        #[arg(short, long)]
        user: Option<String>,
        /// Password of the credential.
        #[arg(short, long)]
        password: Option<String>,
    },
    /// List stored credentials.
    List {
        /// Display passwords in clear text.
        #[arg(short = 'p', long)]
        show_password: bool,
        /// Display API keys in clear text.
        #[arg(short = 'k', long)]
        show_api_key: bool,
    },
    /// Show a single credential.
    Peek {
        /// Id of the credential to show.
        id: Uuid,
        /// Display the password in clear text.
        #[arg(short = 'p', long)]
        show_password: bool,
        /// Display the API key in clear text.
        #[arg(short = 'k', long)]
        show_api_key: bool,
    },
    /// Delete a credential.
    Remove {
        /// Id of the credential to delete.
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run => commands::run_server(&cli.db).await,
        Command::Create { user, password } => commands::create(&cli.db, user, password).await,
        Command::List {
            show_password,
            show_api_key,
        } => commands::list(&cli.db, show_password, show_api_key).await,
        Command::Peek {
            id,
            show_password,
            show_api_key,
        } => commands::peek(&cli.db, &id, show_password, show_api_key).await,
        Command::Remove { id } => commands::remove(&cli.db, &id).await,
    }
}
