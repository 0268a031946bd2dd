//! # Application Configuration
//!
//! Which cluster to talk to, at which commitment level, and which program to invoke.
//! Native builds load the values from environment variables (and a `.env` file through
//! `dotenvy`); the browser build uses [`Config::default()`].
//!
//! | Variable              | Default                                          |
//! |-----------------------|--------------------------------------------------|
//! | `CAMPAIGN_CLUSTER`    | `devnet`                                         |
//! | `CAMPAIGN_RPC_URL`    | cluster endpoint                                 |
//! | `CAMPAIGN_PROGRAM_ID` | `892sb2f1GsHR8i5zXYgtKdVTMhSPWLRGLKiVD2Sz1KKp`   |
//! | `CAMPAIGN_COMMITMENT` | `processed`                                      |
//!
//! ## Global Config Access
//!
//! ```rust,no_run
//! use lib_core::config::{init_config, core_config};
//!
//! init_config().expect("invalid configuration");
//! let config = core_config();
//! println!("RPC: {}", config.rpc_url());
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{AppError, Result};

/// Base58 id of the deployed campaign program.
pub const DEFAULT_PROGRAM_ID: &str = "892sb2f1GsHR8i5zXYgtKdVTMhSPWLRGLKiVD2Sz1KKp";

/// Solana cluster selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    /// Solana devnet (test network)
    #[default]
    Devnet,
    /// Solana testnet
    Testnet,
    /// Solana mainnet-beta (production network)
    Mainnet,
    /// Local test validator
    Localnet,
}

impl Cluster {
    /// Public RPC endpoint of the cluster.
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::Mainnet => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Network label shown to the user once a wallet is connected.
    pub fn label(&self) -> &'static str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::Mainnet => "mainnet-beta",
            Cluster::Localnet => "localnet",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cluster {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            other => Err(AppError::Config(format!("Unknown cluster: {}", other))),
        }
    }
}

/// Ledger acknowledgment-durability tier.
///
/// `Processed` returns as soon as a node has seen the transaction; `Finalized` waits
/// until a supermajority has rooted the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    #[default]
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(AppError::Config(format!("Unknown commitment level: {}", other))),
        }
    }
}

/// Client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Cluster the wallet and RPC node are expected to be on
    pub cluster: Cluster,

    /// Explicit RPC endpoint, overrides the cluster default
    pub rpc_url: Option<String>,

    /// Base58 program id of the campaign program
    pub program_id: String,

    /// Commitment level used for submission and confirmation
    pub commitment: Commitment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster: Cluster::Devnet,
            rpc_url: None,
            program_id: DEFAULT_PROGRAM_ID.to_string(),
            commitment: Commitment::Processed,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let cluster = match env::var("CAMPAIGN_CLUSTER") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.cluster,
        };

        let rpc_url = env::var("CAMPAIGN_RPC_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let program_id = env::var("CAMPAIGN_PROGRAM_ID").unwrap_or(defaults.program_id);

        let commitment = match env::var("CAMPAIGN_COMMITMENT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.commitment,
        };

        Ok(Self {
            cluster,
            rpc_url,
            program_id,
            commitment,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        let decoded = bs58::decode(self.program_id.trim())
            .into_vec()
            .map_err(|e| AppError::Config(format!("Program id is not valid base58: {}", e)))?;

        if decoded.len() != 32 {
            return Err(AppError::Config(format!(
                "Program id must decode to 32 bytes, got {}",
                decoded.len()
            )));
        }

        if let Some(url) = &self.rpc_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config(format!("RPC URL must be http(s): {}", url)));
            }
        }

        Ok(())
    }

    /// The RPC endpoint to use: the explicit override or the cluster default.
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.cluster.rpc_url().to_string())
    }

    /// Network label attached to connected wallet identities.
    pub fn network_label(&self) -> &'static str {
        self.cluster.label()
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load, validate and install the global configuration.
///
/// # Errors
///
/// Returns an error if environment variables are invalid, validation fails, or the
/// config has already been initialized.
pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| AppError::Config("Config has already been initialized".to_string()))?;

    Ok(core_config())
}

/// Get a reference to the global configuration.
///
/// Falls back to [`Config::default()`] when [`init_config()`] was never called.
pub fn core_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
