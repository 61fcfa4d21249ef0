//! PetCare server CLI.
//!
//! Usage:
//!   petcare serve
//!   petcare --config petcare.toml create-account --name "Dr. Rivera" --email rivera@example.com --kind vet
//!   petcare issue-token --email rivera@example.com
//!   petcare revoke-token --token pc_...

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use petcare_api::{api_router, Config};
use petcare_core::{Account, AccountKind, Database};

// ── CLI definition ────────────────────────────────────────────────────────────

/// PetCare appointment scheduling server.
#[derive(Parser)]
#[command(name = "petcare", version, about = "Veterinary appointment scheduling server")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Create an account and print its first API token.
    CreateAccount {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        kind: KindArg,
    },
    /// Issue a new API token for an existing account.
    IssueToken {
        #[arg(long)]
        email: String,
    },
    /// Revoke an API token.
    RevokeToken {
        #[arg(long)]
        token: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Vet,
    Owner,
}

impl From<KindArg> for AccountKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Vet => AccountKind::Vet,
            KindArg::Owner => AccountKind::Owner,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    // RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter)),
        )
        .with_target(false)
        .compact()
        .init();

    let db = Database::open(&config.server.database).with_context(|| {
        format!("opening database {}", config.server.database.display())
    })?;

    match cli.command {
        Command::Serve => serve(config, db).await,
        Command::CreateAccount { name, email, kind } => {
            if db.get_account_by_email(&email)?.is_some() {
                bail!("an account for {} already exists", email);
            }
            let account = Account::new(name, email, kind.into());
            db.insert_account(&account)?;
            let token = db.issue_token(&account.id)?;
            println!("account: {}", account.id);
            println!("token:   {}", token);
            Ok(())
        }
        Command::IssueToken { email } => {
            let account = db
                .get_account_by_email(&email)?
                .with_context(|| format!("no account for {}", email))?;
            println!("{}", db.issue_token(&account.id)?);
            Ok(())
        }
        Command::RevokeToken { token } => {
            if !db.revoke_token(&token)? {
                bail!("token not found");
            }
            info!("Token revoked");
            Ok(())
        }
    }
}

async fn serve(config: Config, db: Database) -> anyhow::Result<()> {
    let policy = config.booking_policy()?;
    let app = api_router(db, policy);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    info!(addr = %config.server.bind, database = %config.server.database.display(), "PetCare listening");

    axum::serve(listener, app).await?;
    Ok(())
}
