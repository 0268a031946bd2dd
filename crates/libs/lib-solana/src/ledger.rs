//! # Ledger Capability
//!
//! The narrow surface the campaign submitter needs from a Solana RPC node. Two
//! implementations exist: [`crate::client::SolanaClient`] over `solana-client` for native
//! builds, and a JSON-RPC client over `fetch` in the browser crate. Tests use the in-memory
//! ledger from `lib_wallet::mock`.
//!
//! The trait is `?Send` so it can be implemented over browser promises.

use async_trait::async_trait;
use lib_core::{AppError, Commitment};
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use thiserror::Error;

/// Errors reported by a ledger endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The request never produced an answer (network, HTTP status, node unhealthy).
    #[error("RPC request failed: {0}")]
    Transport(String),

    /// The node or the program rejected the transaction.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Fee payer cannot cover fees or rent.
    #[error("Insufficient funds for fee or rent")]
    InsufficientFunds,

    /// The blockhash expired before the transaction reached the requested commitment.
    #[error("Blockhash expired before confirmation")]
    BlockhashExpired,

    /// The node answered with something we could not interpret.
    #[error("Unexpected RPC response: {0}")]
    InvalidResponse(String),
}

impl LedgerError {
    /// Classify a free-form node error message.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("insufficient funds") || lower.contains("insufficientfunds") {
            LedgerError::InsufficientFunds
        } else if lower.contains("blockhash not found") || lower.contains("block height exceeded") {
            LedgerError::BlockhashExpired
        } else {
            LedgerError::Rejected(message)
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Transport(msg) | LedgerError::InvalidResponse(msg) => AppError::Rpc(msg),
            LedgerError::Rejected(msg) => AppError::Transaction(msg),
            LedgerError::InsufficientFunds | LedgerError::BlockhashExpired => {
                AppError::Transaction(err.to_string())
            }
        }
    }
}

/// Remote ledger operations used by the campaign client.
#[async_trait(?Send)]
pub trait LedgerRpc {
    /// Commitment level used for reads and confirmation.
    fn commitment(&self) -> Commitment;

    /// Most recent blockhash at [`commitment`](LedgerRpc::commitment).
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError>;

    /// Submit a signed transaction and wait until it reaches
    /// [`commitment`](LedgerRpc::commitment).
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError>;

    /// Raw account data, `None` when the account does not exist.
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError>;
}
