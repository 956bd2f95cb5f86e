use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cookbook::credentials::CredentialStore;
use cookbook::loaders::route::Route;
use cookbook::session::BootstrapState;
use cookbook::{ClientConfig, ClientError};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cookbook", about = "Recipe backend session and page-data CLI")]
struct Cli {
    /// API base URL; overrides `COOKBOOK_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Directory holding the stored credential; overrides `COOKBOOK_CREDENTIAL_DIR`.
    #[arg(long)]
    credential_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a bearer token obtained elsewhere.
    Login {
        #[arg(long, env = "COOKBOOK_TOKEN")]
        token: String,
    },
    /// Forget the stored token.
    Logout,
    /// Bootstrap the session and print the signed-in profile.
    Whoami,
    /// Navigate to a page path and print its data.
    Open { path: String },
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url);
    }
    if let Some(dir) = cli.credential_dir {
        config = config.with_credential_dir(dir);
    }

    let navigator = cookbook::connect(&config)?;
    match cli.command {
        Command::Login { token } => {
            navigator.session().credentials().set(token.trim())?;
            tracing::info!(dir = %config.credential_dir.display(), "credential stored");
            print_json(&json!({ "stored": true }))
        }
        Command::Logout => {
            navigator.session().logout()?;
            print_json(&json!({ "stored": false }))
        }
        Command::Whoami => {
            let outcome = navigator.session().run().await;
            let status = match &outcome.state {
                BootstrapState::Verified(_) => "verified".to_owned(),
                BootstrapState::Anonymous(reason) => format!("anonymous ({reason:?})"),
                BootstrapState::Idle | BootstrapState::Checking => "incomplete".to_owned(),
            };
            print_json(&json!({ "status": status, "user": navigator.session().store().current() }))
        }
        Command::Open { path } => {
            let route: Route = path.parse()?;
            let result = navigator.navigate(route).await;
            print_json(&json!({ "user": navigator.session().store().current(), "data": result.data }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
