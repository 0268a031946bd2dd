//! # Campaign Program
//!
//! Client-side interface to the on-chain crowdfunding program: campaign address derivation,
//! the `create_campaign` transaction and the account decoder.
//!
//! ## Example
//!
//! ```rust
//! use lib_solana::campaign::{CampaignProgram, CreateCampaignArgs};
//! use solana_sdk::{hash::Hash, pubkey::Pubkey};
//!
//! let program = CampaignProgram::default();
//! let creator = Pubkey::new_unique();
//! let args = CreateCampaignArgs {
//!     name: "Well".to_string(),
//!     description: "Clean water".to_string(),
//!     target_amount: 2_000_000_000,
//! };
//!
//! let (tx, campaign) = program
//!     .build_create_campaign_transaction(&creator, &args, Hash::default())
//!     .unwrap();
//! assert_eq!(campaign, program.derive_campaign_address(&creator).0);
//! assert_eq!(tx.message.account_keys[0], creator);
//! ```

pub mod account;
pub mod instruction;

pub use account::{CampaignAccount, CAMPAIGN_ACCOUNT_SPACE, MAX_TEXT_LEN};
pub use instruction::{create_campaign_instruction, CreateCampaignArgs};

use lib_core::config::DEFAULT_PROGRAM_ID;
use lib_core::{AppError, Config, Result};
use solana_sdk::{hash::Hash, message::Message, pubkey::Pubkey, transaction::Transaction};
use std::str::FromStr;
use tracing::debug;

/// Seed prefix of the campaign PDA.
pub const CAMPAIGN_SEED: &[u8] = b"campaign";

/// The system program (all-zero key).
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0; 32]);

/// Handle on one deployment of the crowdfunding program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignProgram {
    program_id: Pubkey,
}

impl Default for CampaignProgram {
    fn default() -> Self {
        let program_id = Pubkey::from_str(DEFAULT_PROGRAM_ID).unwrap_or_default();
        Self { program_id }
    }
}

impl CampaignProgram {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Program named by `config.program_id`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let program_id = Pubkey::from_str(&config.program_id).map_err(|e| {
            AppError::Config(format!("Invalid program id {}: {}", config.program_id, e))
        })?;
        Ok(Self::new(program_id))
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Campaign PDA for `creator`: seeds `["campaign", creator]`.
    ///
    /// One creator owns at most one campaign per program; a second `create_campaign` from the
    /// same creator targets an existing account and is rejected on chain.
    pub fn derive_campaign_address(&self, creator: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[CAMPAIGN_SEED, creator.as_ref()], &self.program_id)
    }

    /// Unsigned single-instruction transaction with `creator` as fee payer.
    ///
    /// Returns the transaction together with the campaign address it initializes.
    pub fn build_create_campaign_transaction(
        &self,
        creator: &Pubkey,
        args: &CreateCampaignArgs,
        recent_blockhash: Hash,
    ) -> Result<(Transaction, Pubkey)> {
        let (campaign, bump) = self.derive_campaign_address(creator);
        debug!("Campaign PDA {} (bump {}) for creator {}", campaign, bump, creator);

        let ix = create_campaign_instruction(&self.program_id, &campaign, creator, args)?;
        let message = Message::new(&[ix], Some(creator));
        let mut transaction = Transaction::new_unsigned(message);
        transaction.message.recent_blockhash = recent_blockhash;

        Ok((transaction, campaign))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CreateCampaignArgs {
        CreateCampaignArgs {
            name: "X".to_string(),
            description: "Y".to_string(),
            target_amount: 1_500_000_000,
        }
    }

    #[test]
    fn test_default_program_id() {
        let program = CampaignProgram::default();
        assert_eq!(program.program_id().to_string(), DEFAULT_PROGRAM_ID);
        assert_eq!(CampaignProgram::from_config(&Config::default()).unwrap(), program);
    }

    #[test]
    fn test_from_config_rejects_bad_id() {
        let config = Config {
            program_id: "not-a-key".to_string(),
            ..Config::default()
        };
        let err = CampaignProgram::from_config(&config).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_pda_is_deterministic_per_creator() {
        let program = CampaignProgram::default();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        let first = program.derive_campaign_address(&alice);
        assert_eq!(first, program.derive_campaign_address(&alice));
        assert_ne!(first.0, program.derive_campaign_address(&bob).0);

        let expected =
            Pubkey::find_program_address(&[b"campaign", alice.as_ref()], program.program_id());
        assert_eq!(first, expected);
    }

    #[test]
    fn test_pda_depends_on_program() {
        let creator = Pubkey::new_unique();
        let a = CampaignProgram::default().derive_campaign_address(&creator);
        let b = CampaignProgram::new(Pubkey::new_unique()).derive_campaign_address(&creator);
        assert_ne!(a.0, b.0);
    }

    #[test]
    fn test_transaction_shape() {
        let program = CampaignProgram::default();
        let creator = Pubkey::new_unique();
        let blockhash = Hash::new_from_array([7; 32]);

        let (tx, campaign) = program
            .build_create_campaign_transaction(&creator, &args(), blockhash)
            .unwrap();

        assert_eq!(tx.message.recent_blockhash, blockhash);
        assert_eq!(tx.message.header.num_required_signatures, 1);
        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(tx.message.account_keys[0], creator);
        assert!(tx.message.account_keys.contains(&campaign));
        assert!(tx.message.account_keys.contains(&SYSTEM_PROGRAM_ID));
        assert!(tx.message.account_keys.contains(program.program_id()));
        assert_eq!(tx.message.instructions.len(), 1);
        assert_eq!(tx.message.instructions[0].data, args().data().unwrap());
    }
}
