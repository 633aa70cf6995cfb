//! Subcommand implementations: server bootstrap and store management.

use std::io::{stdin, stdout, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::credential::Credential;
use crate::server::{router, state::AppState};
use crate::store::CredentialStore;
use crate::telemetry;

/// `credseal run` — start the capsule HTTP server.
///
/// Startup sequence:
/// 1. Load and validate [`Config`] from `CREDSEAL_*` environment variables.
/// 2. Initialise the tracing subscriber.
/// 3. Open the credential store.
/// 4. Build the Axum router and serve.
pub async fn run_server(db: &Path) -> Result<()> {
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    telemetry::init(&cfg.log_level)?;

    let store = CredentialStore::open(db)
        .with_context(|| format!("failed to open credential store at {}", db.display()))?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %db.display(),
        credentials = store.len().await,
        "credseal starting"
    );

    let state = AppState::new(store);
    let app = router::build(state, Duration::from_secs(cfg.request_timeout_secs));

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cfg.host, cfg.port))?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `credseal create` — insert a new credential, prompting for any missing
/// field (the password prompt does not echo).
pub async fn create(db: &Path, user: Option<String>, password: Option<String>) -> Result<()> {
    let user = match user {
        Some(user) => user,
        None => prompt_line("User: ")?,
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };

    let store = CredentialStore::open(db)?;
    let credential = Credential::new(user.trim(), &password);
    let id = credential.id;
    store.insert(credential).await?;
    println!("Inserted credential {}.", id.hyphenated());
    Ok(())
}

/// `credseal list` — print every credential, masking secrets unless asked.
pub async fn list(db: &Path, show_password: bool, show_api_key: bool) -> Result<()> {
    let store = CredentialStore::open(db)?;
    for credential in store.list().await {
        print_credential(&credential, show_password, show_api_key);
        println!();
    }
    println!("{} credentials in total.", store.len().await);
    Ok(())
}

/// `credseal peek <id>` — print a single credential.
pub async fn peek(db: &Path, id: &Uuid, show_password: bool, show_api_key: bool) -> Result<()> {
    let store = CredentialStore::open(db)?;
    match store.get(id).await {
        Some(credential) => print_credential(&credential, show_password, show_api_key),
        None => eprintln!("Credential {} not found.", id.hyphenated()),
    }
    Ok(())
}

/// `credseal remove <id>` — delete a credential.
pub async fn remove(db: &Path, id: &Uuid) -> Result<()> {
    let store = CredentialStore::open(db)?;
    if store.remove(id).await? {
        println!("Deleted credential {}.", id.hyphenated());
    } else {
        eprintln!("Credential {} not found.", id.hyphenated());
    }
    Ok(())
}

fn print_credential(credential: &Credential, show_password: bool, show_api_key: bool) {
    println!("Id = {}", credential.id.hyphenated());
    println!("User = {}", credential.user);
    if show_password {
        println!("Password = {}", credential.password);
    } else {
        println!("Password = {}", "*".repeat(credential.password.len()));
    }
    if show_api_key {
        println!("API Key = {}", hex::encode(credential.api_key));
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    stdout().flush()?;
    let mut line = String::new();
    stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
