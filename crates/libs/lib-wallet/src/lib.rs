//! # Wallet Library
//!
//! Wallet capabilities, the connection lifecycle, campaign submission and the card state that
//! ties them together for a UI.

pub mod card;
pub mod connector;
pub mod keypair;
pub mod manager;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod submitter;

// Re-export commonly used types
pub use card::{CampaignCard, CampaignSummary, CardView};
pub use connector::{ConnectOptions, TransactionSigner, WalletConnector, WalletError};
pub use keypair::KeypairWallet;
pub use manager::ConnectionManager;
pub use submitter::CampaignSubmitter;
