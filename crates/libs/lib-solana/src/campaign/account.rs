//! # Campaign Account Layout
//!
//! Decoder for the account the program initializes.
//!
//! ```text
//! [discriminator: 8] [creator: 32] [name: u32 + bytes] [description: u32 + bytes]
//! [target_amount: u64 LE] [current_funds: u64 LE]
//! ```

use borsh::{BorshDeserialize, BorshSerialize};
use lib_core::{AppError, Result};
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Maximum byte length of `name` and `description`.
pub const MAX_TEXT_LEN: usize = 64;

/// Bytes the program allocates for a campaign account.
pub const CAMPAIGN_ACCOUNT_SPACE: usize = 8 + 32 + (4 + MAX_TEXT_LEN) * 2 + 8 * 2;

/// First 8 bytes of `sha256("account:Campaign")`.
pub fn account_discriminator() -> [u8; 8] {
    let digest = Sha256::digest(b"account:Campaign");
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

/// Decoded campaign state.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CampaignAccount {
    pub creator: Pubkey,
    pub name: String,
    pub description: String,
    /// Lamports
    pub target_amount: u64,
    /// Lamports raised so far
    pub current_funds: u64,
}

impl CampaignAccount {
    /// Decode raw account data. Trailing allocation padding is ignored.
    pub fn try_from_bytes(data: &[u8]) -> Result<Self> {
        let (discriminator, mut body) = data.split_at_checked(8).ok_or_else(|| {
            AppError::Decoding(format!("Account data too short: {} bytes", data.len()))
        })?;
        if discriminator != account_discriminator() {
            return Err(AppError::Decoding(
                "Account is not a campaign (discriminator mismatch)".to_string(),
            ));
        }

        Self::deserialize(&mut body)
            .map_err(|e| AppError::Decoding(format!("Invalid campaign account: {}", e)))
    }

    /// Encode in the program's layout, padded to [`CAMPAIGN_ACCOUNT_SPACE`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(CAMPAIGN_ACCOUNT_SPACE);
        data.extend_from_slice(&account_discriminator());
        self.serialize(&mut data)
            .map_err(|e| AppError::Encoding(format!("Failed to encode campaign: {}", e)))?;

        if data.len() < CAMPAIGN_ACCOUNT_SPACE {
            data.resize(CAMPAIGN_ACCOUNT_SPACE, 0);
        }
        Ok(data)
    }

    /// Fraction of the target raised, in percent.
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount == 0 {
            return 0.0;
        }
        self.current_funds as f64 / self.target_amount as f64 * 100.0
    }
}
