//! # Solana RPC Client
//!
//! Wraps the nonblocking `solana_client` RPC client with cluster selection and a fixed
//! commitment level, and implements [`LedgerRpc`] on top of it.
//!
//! ## RPC Endpoints
//!
//! | Cluster  | URL                                   |
//! |----------|---------------------------------------|
//! | Devnet   | `https://api.devnet.solana.com`       |
//! | Testnet  | `https://api.testnet.solana.com`      |
//! | Mainnet  | `https://api.mainnet-beta.solana.com` |
//! | Localnet | `http://127.0.0.1:8899`               |
//!
//! A custom URL overrides the cluster default.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_core::{Cluster, Commitment};
//! use lib_solana::client::SolanaClient;
//! use lib_solana::ledger::LedgerRpc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SolanaClient::builder()
//!     .cluster(Cluster::Devnet)
//!     .commitment(Commitment::Processed)
//!     .build();
//!
//! let blockhash = client.latest_blockhash().await?;
//! println!("Latest blockhash: {}", blockhash);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use lib_core::{Cluster, Commitment, Config};
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::ledger::{LedgerError, LedgerRpc};

/// RPC client bound to one cluster and one commitment level.
pub struct SolanaClient {
    rpc: Arc<RpcClient>,
    cluster: Cluster,
    commitment: Commitment,
}

/// Builder for configuring SolanaClient.
#[derive(Debug, Clone, Default)]
pub struct SolanaClientBuilder {
    cluster: Cluster,
    custom_rpc_url: Option<String>,
    commitment: Commitment,
}

impl SolanaClientBuilder {
    /// Set the Solana cluster.
    pub fn cluster(mut self, cluster: Cluster) -> Self {
        self.cluster = cluster;
        self
    }

    /// Set a custom RPC URL (overrides cluster-based URL).
    pub fn custom_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.custom_rpc_url = Some(url.into());
        self
    }

    /// Set the commitment level for reads and confirmation.
    pub fn commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    /// Build the SolanaClient with configured settings.
    pub fn build(self) -> SolanaClient {
        let url = self
            .custom_rpc_url
            .unwrap_or_else(|| self.cluster.rpc_url().to_string());

        info!("Connecting to Solana RPC: {} ({})", url, self.commitment);

        let rpc = RpcClient::new_with_commitment(url, commitment_config(self.commitment));
        SolanaClient {
            rpc: Arc::new(rpc),
            cluster: self.cluster,
            commitment: self.commitment,
        }
    }
}

fn commitment_config(commitment: Commitment) -> CommitmentConfig {
    match commitment {
        Commitment::Processed => CommitmentConfig::processed(),
        Commitment::Confirmed => CommitmentConfig::confirmed(),
        Commitment::Finalized => CommitmentConfig::finalized(),
    }
}

fn classify(err: ClientError) -> LedgerError {
    if err.get_transaction_error().is_some() {
        LedgerError::from_message(err.to_string())
    } else {
        let message = err.to_string();
        match LedgerError::from_message(message.clone()) {
            LedgerError::Rejected(_) => LedgerError::Transport(message),
            classified => classified,
        }
    }
}

impl SolanaClient {
    /// Create a new builder (devnet, processed).
    pub fn builder() -> SolanaClientBuilder {
        SolanaClientBuilder::default()
    }

    /// Client for the cluster, endpoint and commitment named in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::builder()
            .cluster(config.cluster)
            .custom_rpc_url(config.rpc_url())
            .commitment(config.commitment)
            .build()
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }

    /// Verify RPC endpoint connectivity.
    pub async fn health_check(&self) -> Result<(), LedgerError> {
        self.rpc
            .get_health()
            .await
            .map_err(|e| LedgerError::Transport(format!("Health check failed: {}", e)))
    }
}

#[async_trait(?Send)]
impl LedgerRpc for SolanaClient {
    fn commitment(&self) -> Commitment {
        self.commitment
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        self.rpc.get_latest_blockhash().await.map_err(classify)
    }

    #[instrument(skip(self, transaction), fields(commitment = %self.commitment))]
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError> {
        let signature = self
            .rpc
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(classify)?;

        debug!("Transaction {} reached {}", signature, self.commitment);
        Ok(signature)
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await
            .map_err(classify)?;

        Ok(response.value.map(|account| account.data))
    }
}
