//! # Campaign Submitter
//!
//! Turns a connected identity and a form draft into one confirmed `create_campaign`
//! transaction.
//!
//! ## Flow
//!
//! 1. No identity: fail with [`AppError::WalletNotConnected`] before any network call
//! 2. Validate the draft (required fields, text limits, amount)
//! 3. Derive the campaign PDA
//! 4. Fetch a recent blockhash and assemble the transaction
//! 5. Have the wallet sign it
//! 6. Send and wait for the ledger's commitment level
//!
//! Nothing is retried and nothing is kept between calls.

use lib_core::{AppError, CampaignDraft, Result, SubmissionResult, SubmittedCampaign, WalletIdentity};
use lib_solana::campaign::{CampaignAccount, CampaignProgram, CreateCampaignArgs};
use lib_solana::ledger::LedgerRpc;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::{debug, error, info, instrument};

use crate::connector::TransactionSigner;

pub struct CampaignSubmitter<S, L> {
    signer: S,
    ledger: L,
    program: CampaignProgram,
}

impl<S: TransactionSigner, L: LedgerRpc> CampaignSubmitter<S, L> {
    pub fn new(signer: S, ledger: L, program: CampaignProgram) -> Self {
        Self {
            signer,
            ledger,
            program,
        }
    }

    pub fn program(&self) -> &CampaignProgram {
        &self.program
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Create a campaign owned by `identity`.
    #[instrument(skip_all, fields(creator = identity.map(|i| i.public_address.as_str()).unwrap_or("-")))]
    pub async fn submit_campaign(
        &self,
        identity: Option<&WalletIdentity>,
        draft: &CampaignDraft,
    ) -> SubmissionResult {
        let result = self.submit(identity, draft).await;
        match &result {
            Ok(submitted) => info!(
                "Campaign {} created: {}",
                submitted.campaign_address, submitted.transaction_id
            ),
            Err(err) => error!("Campaign submission failed: {}", err),
        }
        result
    }

    async fn submit(
        &self,
        identity: Option<&WalletIdentity>,
        draft: &CampaignDraft,
    ) -> SubmissionResult {
        let identity = identity.ok_or(AppError::WalletNotConnected)?;
        let args = CreateCampaignArgs::from_draft(draft)?;
        let creator = parse_address(&identity.public_address)?;

        let blockhash = self.ledger.latest_blockhash().await?;
        let (transaction, campaign) =
            self.program
                .build_create_campaign_transaction(&creator, &args, blockhash)?;
        debug!("Requesting signature for campaign {}", campaign);

        let signed = self.signer.sign_transaction(transaction).await?;
        if !signed.is_signed() {
            return Err(AppError::Signing(
                "Wallet returned an unsigned transaction".to_string(),
            ));
        }

        let signature = self.ledger.send_and_confirm(&signed).await?;
        debug!("Confirmed at {}", self.ledger.commitment());

        Ok(SubmittedCampaign {
            transaction_id: signature.to_string(),
            campaign_address: campaign.to_string(),
            target_lamports: args.target_amount,
        })
    }

    /// Load the campaign owned by `identity`, `None` if it has not been created.
    #[instrument(skip_all, fields(creator = %identity.public_address))]
    pub async fn fetch_campaign(&self, identity: &WalletIdentity) -> Result<Option<CampaignAccount>> {
        let creator = parse_address(&identity.public_address)?;
        let (campaign, _) = self.program.derive_campaign_address(&creator);

        match self.ledger.get_account_data(&campaign).await? {
            Some(data) => CampaignAccount::try_from_bytes(&data).map(Some),
            None => Ok(None),
        }
    }
}

fn parse_address(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address)
        .map_err(|e| AppError::Wallet(format!("Wallet returned an invalid address: {}", e)))
}
