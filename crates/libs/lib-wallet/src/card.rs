//! # Campaign Card
//!
//! UI state behind the wallet card: connection status, the campaign form, the outcome of
//! the last submission and the campaign it created. Every failure from the manager or the submitter ends here as the
//! card's error text; nothing propagates further.
//!
//! The card is framework-agnostic. The browser crate calls the `on_*` handlers from event
//! callbacks and re-renders from [`CampaignCard::view`].

use lib_core::{CampaignDraft, ConnectionState, SubmissionResult, SubmittedCampaign, WalletIdentity};
use lib_solana::amount::format_lamports;
use lib_solana::campaign::CampaignAccount;
use lib_solana::ledger::LedgerRpc;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use crate::connector::{TransactionSigner, WalletConnector};
use crate::manager::ConnectionManager;
use crate::submitter::CampaignSubmitter;

pub const NO_ACCOUNT: &str = "No Account Detected";
pub const NO_CHAIN: &str = "No Chain Connected";

#[derive(Debug, Default)]
struct CardUi {
    draft: CampaignDraft,
    error: Option<String>,
    last_transaction: Option<SubmittedCampaign>,
    campaign: Option<CampaignSummary>,
    submitting: bool,
}

/// Display fields of a campaign read back from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub address: String,
    pub name: String,
    pub description: String,
    /// SOL
    pub target: String,
    /// SOL raised so far
    pub raised: String,
    /// Whole percent of the target raised
    pub progress: u32,
}

impl CampaignSummary {
    pub fn new(address: impl Into<String>, account: &CampaignAccount) -> Self {
        Self {
            address: address.into(),
            name: account.name.clone(),
            description: account.description.clone(),
            target: format_lamports(account.target_amount),
            raised: format_lamports(account.current_funds),
            progress: account.progress_percent().floor() as u32,
        }
    }
}

/// Everything the card renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub display_name: String,
    pub status_text: String,
    pub address_text: String,
    pub network_text: String,
    pub button_label: &'static str,
    pub form_visible: bool,
    pub submitting: bool,
    pub draft: CampaignDraft,
    pub error: Option<String>,
    pub last_transaction: Option<SubmittedCampaign>,
    pub campaign: Option<CampaignSummary>,
}

pub struct CampaignCard<W, S, L> {
    manager: ConnectionManager<W>,
    submitter: CampaignSubmitter<S, L>,
    ui: Mutex<CardUi>,
}

impl<W, S, L> CampaignCard<W, S, L>
where
    W: WalletConnector,
    S: TransactionSigner,
    L: LedgerRpc,
{
    pub fn new(manager: ConnectionManager<W>, submitter: CampaignSubmitter<S, L>) -> Self {
        Self {
            manager,
            submitter,
            ui: Mutex::new(CardUi::default()),
        }
    }

    pub fn manager(&self) -> &ConnectionManager<W> {
        &self.manager
    }

    pub fn submitter(&self) -> &CampaignSubmitter<S, L> {
        &self.submitter
    }

    /// Silent reconnect on mount. Never sets the error text.
    pub async fn on_mount(&self) {
        self.manager.attempt_silent_connect().await;
    }

    /// Connect/disconnect button.
    pub async fn on_toggle(&self) {
        self.ui.lock().error = None;

        let state = self.manager.toggle_connect().await;
        if let ConnectionState::Failed(err) = state {
            self.ui.lock().error = Some(err.user_message());
        }
    }

    pub fn set_name(&self, value: impl Into<String>) {
        self.ui.lock().draft.name = value.into();
    }

    pub fn set_description(&self, value: impl Into<String>) {
        self.ui.lock().draft.description = value.into();
    }

    pub fn set_target_amount(&self, value: impl Into<String>) {
        self.ui.lock().draft.target_amount = value.into();
    }

    /// "Create Campaign" button. Ignored while a submission is in flight.
    ///
    /// On success the new campaign is read back for display. A failed read only logs; the
    /// submission itself already succeeded.
    pub async fn on_submit(&self) -> Option<SubmissionResult> {
        let draft = {
            let mut ui = self.ui.lock();
            if ui.submitting {
                return None;
            }
            ui.submitting = true;
            ui.last_transaction = None;
            ui.campaign = None;
            ui.draft.clone()
        };

        let identity = self.manager.identity();
        let result = self
            .submitter
            .submit_campaign(identity.as_ref(), &draft)
            .await;

        let campaign = match (&result, &identity) {
            (Ok(submitted), Some(identity)) => {
                self.load_campaign(identity, &submitted.campaign_address).await
            }
            _ => None,
        };

        let mut ui = self.ui.lock();
        ui.submitting = false;
        match &result {
            Ok(submitted) => {
                info!("Transaction ID: {}", submitted.transaction_id);
                ui.error = None;
                ui.last_transaction = Some(submitted.clone());
                ui.campaign = campaign;
            }
            Err(err) => {
                warn!("Create campaign failed: {}", err);
                ui.error = Some(err.user_message());
            }
        }
        Some(result)
    }

    async fn load_campaign(
        &self,
        identity: &WalletIdentity,
        address: &str,
    ) -> Option<CampaignSummary> {
        match self.submitter.fetch_campaign(identity).await {
            Ok(Some(account)) => Some(CampaignSummary::new(address, &account)),
            Ok(None) => {
                warn!("Campaign {} not visible yet", address);
                None
            }
            Err(err) => {
                warn!("Could not load campaign {}: {}", address, err);
                None
            }
        }
    }

    pub fn error(&self) -> Option<String> {
        self.ui.lock().error.clone()
    }

    /// Snapshot of the card for rendering.
    pub fn view(&self) -> CardView {
        let state = self.manager.state();
        let identity = self.manager.identity();
        let ui = self.ui.lock();

        let status_text = match &ui.error {
            Some(error) => format!("Error: {}", error),
            None => state.label().to_string(),
        };

        CardView {
            display_name: self.manager.wallet().name().to_uppercase(),
            status_text,
            address_text: identity
                .as_ref()
                .map(|i| i.public_address.clone())
                .unwrap_or_else(|| NO_ACCOUNT.to_string()),
            network_text: identity
                .as_ref()
                .map(|i| i.network.clone())
                .unwrap_or_else(|| NO_CHAIN.to_string()),
            button_label: if state.is_connected() { "Disconnect" } else { "Connect" },
            form_visible: state.is_connected(),
            submitting: ui.submitting,
            draft: ui.draft.clone(),
            error: ui.error.clone(),
            last_transaction: ui.last_transaction.clone(),
            campaign: ui.campaign.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockLedger, MockWallet};
    use lib_solana::campaign::CampaignProgram;

    type Card = CampaignCard<MockWallet, MockWallet, MockLedger>;

    fn card(wallet: &MockWallet) -> (Card, MockLedger) {
        let program = CampaignProgram::default();
        let ledger = MockLedger::new(*program.program_id());
        let card = CampaignCard::new(
            ConnectionManager::new(wallet.clone(), "devnet"),
            CampaignSubmitter::new(wallet.clone(), ledger.clone(), program),
        );
        (card, ledger)
    }

    #[tokio::test]
    async fn test_initial_view() {
        let (card, _) = card(&MockWallet::new("Phantom"));
        let view = card.view();

        assert_eq!(view.display_name, "PHANTOM");
        assert_eq!(view.status_text, "Disconnected");
        assert_eq!(view.address_text, NO_ACCOUNT);
        assert_eq!(view.network_text, NO_CHAIN);
        assert_eq!(view.button_label, "Connect");
        assert!(!view.form_visible);
    }

    #[tokio::test]
    async fn test_failed_connect_shows_error_until_next_toggle() {
        let wallet = MockWallet::new("Phantom");
        wallet.reject_next_connect("User rejected the request.");
        let (card, _) = card(&wallet);

        card.on_toggle().await;
        assert_eq!(card.view().status_text, "Error: User rejected the request.");
        assert_eq!(card.view().button_label, "Connect");

        card.on_toggle().await;
        let view = card.view();
        assert_eq!(view.status_text, "Connected");
        assert_eq!(view.button_label, "Disconnect");
        assert!(view.form_visible);
        assert_eq!(view.address_text, wallet.address());
        assert_eq!(view.network_text, "devnet");
    }

    #[tokio::test]
    async fn test_submit_failure_then_success() {
        let wallet = MockWallet::new("Phantom");
        let (card, ledger) = card(&wallet);
        card.on_toggle().await;

        card.set_name("Well");
        card.set_description("Clean water");
        card.set_target_amount("abc");
        let result = card.on_submit().await.unwrap();
        assert!(result.is_err());
        assert!(card.view().status_text.starts_with("Error: "));
        assert_eq!(card.view().last_transaction, None);
        assert_eq!(ledger.network_calls(), 0);

        card.set_target_amount("1");
        let submitted = card.on_submit().await.unwrap().unwrap();
        let view = card.view();
        assert_eq!(view.error, None);
        assert_eq!(view.status_text, "Connected");
        assert_eq!(view.last_transaction, Some(submitted));
    }

    #[tokio::test]
    async fn test_rpc_failure_shows_friendly_message() {
        let wallet = MockWallet::new("Phantom");
        let (card, ledger) = card(&wallet);
        ledger.fail_blockhash(lib_solana::LedgerError::Transport("connection refused".into()));
        card.on_toggle().await;

        card.set_name("Well");
        card.set_description("Clean water");
        card.set_target_amount("1");
        card.on_submit().await;

        assert_eq!(card.view().status_text, "Error: Network temporarily unavailable");
    }

    #[tokio::test]
    async fn test_created_campaign_is_loaded_for_display() {
        // Arrange
        let wallet = MockWallet::new("Phantom");
        let (card, _) = card(&wallet);
        card.on_toggle().await;
        card.set_name("Well");
        card.set_description("Clean water");
        card.set_target_amount("2.5");

        // Act
        let submitted = card.on_submit().await.unwrap().unwrap();

        // Assert
        let summary = card.view().campaign.unwrap();
        assert_eq!(summary.address, submitted.campaign_address);
        assert_eq!(summary.name, "Well");
        assert_eq!(summary.description, "Clean water");
        assert_eq!(summary.target, "2.5");
        assert_eq!(summary.raised, "0");
        assert_eq!(summary.progress, 0);
    }

    #[tokio::test]
    async fn test_unreadable_campaign_keeps_successful_submission() {
        let wallet = MockWallet::new("Phantom");
        let (card, ledger) = card(&wallet);
        ledger.fail_account(lib_solana::LedgerError::Transport("connection reset".into()));
        card.on_toggle().await;
        card.set_name("Well");
        card.set_description("Clean water");
        card.set_target_amount("1");

        let submitted = card.on_submit().await.unwrap().unwrap();

        let view = card.view();
        assert_eq!(view.error, None);
        assert_eq!(view.last_transaction, Some(submitted));
        assert_eq!(view.campaign, None);
    }

    #[tokio::test]
    async fn test_failed_submission_clears_previous_campaign() {
        let wallet = MockWallet::new("Phantom");
        let (card, _) = card(&wallet);
        card.on_toggle().await;
        card.set_name("Well");
        card.set_description("Clean water");
        card.set_target_amount("1");
        card.on_submit().await;
        assert!(card.view().campaign.is_some());

        // Same creator, same PDA: the ledger refuses a second campaign.
        card.on_submit().await;

        let view = card.view();
        assert!(view.error.is_some());
        assert_eq!(view.campaign, None);
    }

    #[test]
    fn test_summary_formats_amounts() {
        let account = CampaignAccount {
            creator: solana_sdk::pubkey::Pubkey::new_unique(),
            name: "Well".to_string(),
            description: "Clean water".to_string(),
            target_amount: 3_000_000_000,
            current_funds: 1_000_000_000,
        };

        let summary = CampaignSummary::new("addr", &account);

        assert_eq!(summary.target, "3");
        assert_eq!(summary.raised, "1");
        assert_eq!(summary.progress, 33);
    }
}
