//! # Create Campaign Instruction
//!
//! The `create_campaign` instruction: an 8-byte Anchor discriminator followed by the
//! Borsh-encoded arguments.
//!
//! ```text
//! [discriminator: 8] [name_len: u32 LE] [name] [desc_len: u32 LE] [desc] [target: u64 LE]
//! ```
//!
//! Account order matches the program's `CreateCampaign` accounts struct:
//!
//! | # | Account        | Signer | Writable |
//! |---|----------------|--------|----------|
//! | 0 | campaign (PDA) | no     | yes      |
//! | 1 | creator        | yes    | yes      |
//! | 2 | system program | no     | no       |

use borsh::{BorshDeserialize, BorshSerialize};
use lib_core::{AppError, CampaignDraft, Result};
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::account::MAX_TEXT_LEN;
use super::SYSTEM_PROGRAM_ID;
use crate::amount::parse_sol_amount;

/// Anchor method name of the entry point.
pub const CREATE_CAMPAIGN_METHOD: &str = "create_campaign";

/// First 8 bytes of `sha256("global:<method>")`.
pub fn instruction_discriminator(method: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{}", method).as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

/// Validated arguments of `create_campaign`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreateCampaignArgs {
    pub name: String,
    pub description: String,
    /// Target in lamports
    pub target_amount: u64,
}

impl CreateCampaignArgs {
    /// Validate a form draft and convert its SOL amount to lamports.
    ///
    /// Text is sent exactly as typed; whitespace only matters for the required-field check.
    pub fn from_draft(draft: &CampaignDraft) -> Result<Self> {
        draft.ensure_complete()?;

        let args = Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            target_amount: parse_sol_amount(&draft.target_amount)?,
        };
        args.validate()?;
        Ok(args)
    }

    /// Check the text fields fit the space the program allocates for them.
    pub fn validate(&self) -> Result<()> {
        check_text("Campaign name", &self.name)?;
        check_text("Description", &self.description)?;
        if self.target_amount == 0 {
            return Err(AppError::InvalidInput(
                "Target amount must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Discriminator plus Borsh-encoded arguments.
    pub fn data(&self) -> Result<Vec<u8>> {
        let mut data = instruction_discriminator(CREATE_CAMPAIGN_METHOD).to_vec();
        self.serialize(&mut data)
            .map_err(|e| AppError::Encoding(format!("Failed to encode arguments: {}", e)))?;
        Ok(data)
    }

    /// Parse instruction data produced by [`data`](Self::data).
    pub fn try_from_data(data: &[u8]) -> Result<Self> {
        match data.split_at_checked(8) {
            Some((discriminator, args))
                if discriminator == instruction_discriminator(CREATE_CAMPAIGN_METHOD) =>
            {
                Self::try_from_slice(args)
                    .map_err(|e| AppError::Decoding(format!("Invalid create_campaign data: {}", e)))
            }
            _ => Err(AppError::Decoding(
                "Not a create_campaign instruction".to_string(),
            )),
        }
    }
}

fn check_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    if value.len() > MAX_TEXT_LEN {
        return Err(AppError::InvalidInput(format!(
            "{} must be at most {} bytes, got {}",
            field,
            MAX_TEXT_LEN,
            value.len()
        )));
    }
    Ok(())
}

/// Build the instruction for an already-derived campaign address.
pub fn create_campaign_instruction(
    program_id: &Pubkey,
    campaign: &Pubkey,
    creator: &Pubkey,
    args: &CreateCampaignArgs,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*campaign, false),
            AccountMeta::new(*creator, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: args.data()?,
    })
}
