//! # Campaign CLI
//!
//! Creates and inspects campaigns from a local keypair, against the cluster configured in
//! the environment (see `lib_core::config`).

mod commands;

use clap::{Parser, Subcommand};
use lib_core::config::init_config;
use lib_core::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "campaign")]
#[command(about = "Create Solana crowdfunding campaigns from a local keypair")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the RPC endpoint and print the active configuration
    Status,
    /// Create the campaign owned by the keypair
    Create {
        /// Keypair file (JSON byte array or base58)
        #[arg(short, long, env = "CAMPAIGN_KEYPAIR")]
        keypair: PathBuf,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: String,

        /// Target amount in SOL
        #[arg(short, long)]
        target: String,
    },
    /// Show the campaign owned by the keypair
    Show {
        #[arg(short, long, env = "CAMPAIGN_KEYPAIR")]
        keypair: PathBuf,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let config = init_config()?;

    match cli.command {
        Commands::Status => commands::status(config).await,
        Commands::Create {
            keypair,
            name,
            description,
            target,
        } => commands::create(config, &keypair, name, description, target).await,
        Commands::Show { keypair } => commands::show(config, &keypair).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    lib_core::logging::init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = err.code(), "{}", err);
            eprintln!("error: {}", err.user_message());
            ExitCode::FAILURE
        }
    }
}
