use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use mycoin::storage::FileStorage;
use mycoin::{HttpClient, Onboarding, StagingStore, WalletSession};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;
mod sub_commands;
mod utils;

const DEFAULT_WORK_DIR: &str = ".mycoin-cli";

/// Command line wallet for MyCoin
#[derive(Parser)]
#[command(name = "mycoin-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to working dir
    #[arg(short, long)]
    work_dir: Option<PathBuf>,
    /// Logging level
    #[arg(short, long, default_value = "error")]
    log_level: Level,
    /// Wallet server API URL
    #[arg(short, long, env = "MYCOIN_CLI_API_URL")]
    api_url: Option<Url>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a wallet with a new recovery phrase
    Create(sub_commands::create::CreateSubCommand),
    /// Show the staged recovery phrase
    Phrase,
    /// Verify the staged recovery phrase and create the wallet
    Verify,
    /// Import a wallet from a recovery phrase
    Import(sub_commands::import::ImportSubCommand),
    /// Balance of the loaded wallet
    Balance,
    /// Transaction history of the loaded wallet
    History,
    /// Send coins
    Send(sub_commands::send::SendSubCommand),
    /// Browse all chain transactions
    Explorer(sub_commands::explorer::ExplorerSubCommand),
    /// Load a wallet by address
    Load(sub_commands::load::LoadSubCommand),
    /// Forget the loaded wallet
    Logout,
    /// Mining controls
    Mining(sub_commands::mining::MiningSubCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();
    let default_filter = args.log_level;

    let reqwest_filter = "reqwest=warn";

    let env_filter = EnvFilter::new(format!("{},{}", default_filter, reqwest_filter));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let work_dir = match &args.work_dir {
        Some(work_dir) => work_dir.clone(),
        None => home::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .join(DEFAULT_WORK_DIR),
    };

    fs::create_dir_all(&work_dir)?;

    let settings = config::Settings::new(&work_dir).from_env();

    let api_url = match &args.api_url {
        Some(api_url) => api_url.clone(),
        None => Url::parse(&settings.api_url)?,
    };
    tracing::debug!("Using wallet server {}", api_url);

    let client = HttpClient::new(api_url);

    // The wallet mirror outlives a run, staged secrets live in their own dir
    let session_storage = Arc::new(FileStorage::new(work_dir.join("wallet")).await?);
    let staging_storage = Arc::new(FileStorage::new(work_dir.join("staging")).await?);

    let session = Arc::new(WalletSession::new(Arc::new(client), session_storage));
    let staging = StagingStore::new(staging_storage)
        .with_ttl(Duration::from_secs(settings.staging_ttl_secs));

    let onboarding =
        Onboarding::new(session.clone(), staging).with_phrase_length(settings.phrase_length);

    match &args.command {
        Commands::Create(sub_command_args) => {
            let onboarding = onboarding.with_quiz(settings.quiz_config()?);
            sub_commands::create::create(&onboarding, sub_command_args).await
        }
        Commands::Phrase => sub_commands::phrase::phrase(&onboarding).await,
        Commands::Verify => {
            let onboarding = onboarding.with_quiz(settings.quiz_config()?);
            sub_commands::verify::verify(&onboarding).await
        }
        Commands::Import(sub_command_args) => {
            sub_commands::import::import(&onboarding, sub_command_args).await
        }
        Commands::Balance => sub_commands::balance::balance(&session).await,
        Commands::History => sub_commands::history::history(&session).await,
        Commands::Send(sub_command_args) => {
            sub_commands::send::send(&session, sub_command_args).await
        }
        Commands::Explorer(sub_command_args) => {
            sub_commands::explorer::explorer(&session, sub_command_args).await
        }
        Commands::Load(sub_command_args) => {
            sub_commands::load::load(&session, sub_command_args).await
        }
        Commands::Logout => sub_commands::logout::logout(&session).await,
        Commands::Mining(sub_command_args) => {
            sub_commands::mining::mining(&session, sub_command_args).await
        }
    }
}
