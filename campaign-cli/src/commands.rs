//! Subcommand handlers.
//!
//! `create` and `show` drive the same [`CampaignCard`] the browser uses, with a
//! [`KeypairWallet`] in place of the extension and [`SolanaClient`] as the ledger.

use lib_core::{AppError, Config, Result};
use lib_solana::ledger::LedgerRpc;
use lib_solana::{CampaignProgram, SolanaClient};
use lib_wallet::{
    CampaignCard, CampaignSubmitter, CampaignSummary, CardView, ConnectionManager, KeypairWallet,
    TransactionSigner, WalletConnector,
};
use std::path::Path;
use tracing::info;

type NativeCard = CampaignCard<KeypairWallet, KeypairWallet, SolanaClient>;

fn native_card(config: &Config, keypair: &Path) -> Result<NativeCard> {
    let wallet = KeypairWallet::from_file(keypair)?;
    let program = CampaignProgram::from_config(config)?;
    info!("Using {} on {}", wallet.pubkey(), config.network_label());

    Ok(CampaignCard::new(
        ConnectionManager::new(wallet.clone(), config.network_label()),
        CampaignSubmitter::new(wallet, SolanaClient::from_config(config), program),
    ))
}

pub async fn status(config: &Config) -> Result<()> {
    let client = SolanaClient::from_config(config);
    let program = CampaignProgram::from_config(config)?;
    client.health_check().await?;

    println!("Cluster:    {}", client.cluster());
    println!("RPC:        {} (healthy)", client.url());
    println!("Commitment: {}", client.commitment());
    println!("Program:    {}", program.program_id());
    Ok(())
}

pub async fn create(
    config: &Config,
    keypair: &Path,
    name: String,
    description: String,
    target: String,
) -> Result<()> {
    let card = native_card(config, keypair)?;
    let view = create_campaign(&card, name, description, target).await?;

    if let Some(submitted) = &view.last_transaction {
        println!("Transaction: {}", submitted.transaction_id);
        println!("Campaign:    {}", submitted.campaign_address);
    }
    if let Some(campaign) = &view.campaign {
        println!("{}", render_campaign(campaign));
    }
    Ok(())
}

pub async fn show(config: &Config, keypair: &Path) -> Result<()> {
    let card = native_card(config, keypair)?;
    connect(&card).await?;
    let identity = card
        .manager()
        .identity()
        .ok_or(AppError::WalletNotConnected)?;

    match card.submitter().fetch_campaign(&identity).await? {
        Some(account) => {
            let (address, _) = card
                .submitter()
                .program()
                .derive_campaign_address(&account.creator);
            println!("{}", render_campaign(&CampaignSummary::new(address.to_string(), &account)));
        }
        None => println!("No campaign for {}", identity.public_address),
    }
    Ok(())
}

/// Restore a trusted session, otherwise connect explicitly.
async fn connect<W, S, L>(card: &CampaignCard<W, S, L>) -> Result<()>
where
    W: WalletConnector,
    S: TransactionSigner,
    L: LedgerRpc,
{
    card.on_mount().await;
    if card.manager().identity().is_none() {
        card.on_toggle().await;
    }
    match card.manager().state().error() {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

/// Connect, fill the form and submit; returns the card as it ends up.
async fn create_campaign<W, S, L>(
    card: &CampaignCard<W, S, L>,
    name: String,
    description: String,
    target: String,
) -> Result<CardView>
where
    W: WalletConnector,
    S: TransactionSigner,
    L: LedgerRpc,
{
    connect(card).await?;

    card.set_name(name);
    card.set_description(description);
    card.set_target_amount(target);

    card.on_submit()
        .await
        .ok_or_else(|| AppError::Internal("A submission is already in progress".to_string()))??;
    Ok(card.view())
}

fn render_campaign(campaign: &CampaignSummary) -> String {
    format!(
        "{}\n  {}\n  Address: {}\n  Raised:  {} / {} SOL ({}%)",
        campaign.name,
        campaign.description,
        campaign.address,
        campaign.raised,
        campaign.target,
        campaign.progress
    )
}
