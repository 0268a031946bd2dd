//! # Solana Library
//!
//! Campaign program interface, SOL amount handling, transaction wire format and the ledger
//! capability with its native RPC implementation.

pub mod amount;
pub mod campaign;
#[cfg(feature = "rpc")]
pub mod client;
pub mod ledger;
pub mod wire;

// Re-export commonly used types from root for convenience
pub use amount::{format_lamports, parse_sol_amount, LAMPORTS_PER_SOL};
pub use campaign::{CampaignAccount, CampaignProgram, CreateCampaignArgs};
#[cfg(feature = "rpc")]
pub use client::SolanaClient;
pub use ledger::{LedgerError, LedgerRpc};
pub use wire::{decode_transaction, encode_transaction};

// Signing and key types used across the workspace
pub use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
