//! # Domain Model
//!
//! Connection lifecycle, the connected identity, the user's campaign draft and the outcome
//! of a submission. None of these are persisted.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Wallet connection lifecycle.
///
/// ```text
/// Disconnected --toggle--> Connecting --ok--> Connected --toggle--> Disconnected
///                               |
///                               +--err--> Failed --toggle--> Connecting
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// The last interactive connect attempt was rejected.
    Failed(AppError),
}

impl ConnectionState {
    /// Status text shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting..",
            ConnectionState::Connected => "Connected",
            ConnectionState::Failed(_) => "Connection Failed",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting)
    }

    /// `Failed` behaves like `Disconnected` for input purposes.
    pub fn accepts_connect(&self) -> bool {
        matches!(self, ConnectionState::Disconnected | ConnectionState::Failed(_))
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            ConnectionState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Account identity of a connected wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletIdentity {
    /// Base58 public address reported by the wallet
    pub public_address: String,
    /// Network label (e.g. "devnet")
    pub network: String,
}

impl WalletIdentity {
    pub fn new(public_address: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            public_address: public_address.into(),
            network: network.into(),
        }
    }
}

/// User-entered campaign form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub name: String,
    pub description: String,
    /// Target in SOL as typed by the user
    pub target_amount: String,
}

impl CampaignDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target_amount: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            target_amount: target_amount.into(),
        }
    }

    /// Names of the fields that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.target_amount.trim().is_empty() {
            missing.push("target amount");
        }
        missing
    }

    /// Fails with an input error naming the blank fields.
    pub fn ensure_complete(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidInput(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// A campaign creation acknowledged by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedCampaign {
    /// Base58 transaction signature
    pub transaction_id: String,
    /// Derived campaign account
    pub campaign_address: String,
    /// Target amount as sent to the program
    pub target_lamports: u64,
}

/// Outcome of a single submit call.
pub type SubmissionResult = Result<SubmittedCampaign>;
