//! # Campaign Flow Tests
//!
//! Connection lifecycle, submission and card behavior against the in-memory wallet and ledger.

use futures::join;
use lib_core::{AppError, CampaignDraft, ConnectionState, WalletIdentity};
use lib_solana::campaign::CampaignProgram;
use lib_solana::LedgerError;
use lib_wallet::mock::{MockLedger, MockWallet};
use lib_wallet::{CampaignCard, CampaignSubmitter, ConnectionManager};

type Card = CampaignCard<MockWallet, MockWallet, MockLedger>;

fn setup(wallet: &MockWallet) -> (Card, MockLedger) {
    let program = CampaignProgram::default();
    let ledger = MockLedger::new(*program.program_id());
    let card = CampaignCard::new(
        ConnectionManager::new(wallet.clone(), "devnet"),
        CampaignSubmitter::new(wallet.clone(), ledger.clone(), program),
    );
    (card, ledger)
}

fn fill(card: &Card, name: &str, description: &str, amount: &str) {
    card.set_name(name);
    card.set_description(description);
    card.set_target_amount(amount);
}

// ============================================================================
// CONNECTION
// ============================================================================

#[tokio::test]
async fn test_toggle_while_connecting_is_ignored() {
    // Arrange
    let wallet = MockWallet::new("Phantom");
    let gate = wallet.hold_next_connect();
    let manager = ConnectionManager::new(wallet.clone(), "devnet");

    // Act
    let (first, second) = join!(manager.toggle_connect(), async {
        let second = manager.toggle_connect().await;
        gate.approve();
        second
    });

    // Assert
    assert_eq!(second, ConnectionState::Connecting);
    assert_eq!(first, ConnectionState::Connected);
    assert_eq!(wallet.connect_calls(), 1);
}

#[tokio::test]
async fn test_silent_connect_failure_sets_no_error() {
    let wallet = MockWallet::new("Phantom");
    let (card, _) = setup(&wallet);

    card.on_mount().await;

    let view = card.view();
    assert_eq!(view.status_text, "Disconnected");
    assert_eq!(view.error, None);
    assert_eq!(wallet.silent_connect_calls(), 1);
    assert_eq!(wallet.connect_calls(), 0);
}

#[tokio::test]
async fn test_silent_connect_rejection_sets_no_error() {
    let wallet = MockWallet::new("Phantom").trusted(true);
    wallet.reject_next_connect("Wallet is locked");
    let (card, _) = setup(&wallet);

    card.on_mount().await;

    assert_eq!(card.manager().state(), ConnectionState::Disconnected);
    assert_eq!(card.error(), None);
}

#[tokio::test]
async fn test_silent_connect_restores_trusted_session() {
    let wallet = MockWallet::new("Phantom").trusted(true);
    let (card, _) = setup(&wallet);

    card.on_mount().await;

    let view = card.view();
    assert_eq!(view.status_text, "Connected");
    assert_eq!(view.address_text, wallet.address());
    assert!(view.form_visible);
}

#[tokio::test]
async fn test_stale_silent_failure_cannot_undo_user_connect() {
    // Arrange
    let wallet = MockWallet::new("Phantom");
    let silent_gate = wallet.hold_next_connect();
    let manager = ConnectionManager::new(wallet.clone(), "devnet");

    // Act: the user connects while the silent attempt is still pending
    let (silent, clicked) = join!(manager.attempt_silent_connect(), async {
        let state = manager.toggle_connect().await;
        silent_gate.reject("Not trusted");
        state
    });

    // Assert
    assert_eq!(clicked, ConnectionState::Connected);
    assert_eq!(silent, ConnectionState::Connected);
    assert_eq!(manager.state(), ConnectionState::Connected);
    assert_eq!(
        manager.identity(),
        Some(WalletIdentity::new(wallet.address(), "devnet"))
    );
}

#[tokio::test]
async fn test_stale_silent_success_cannot_undo_user_failure() {
    let wallet = MockWallet::new("Phantom");
    let silent_gate = wallet.hold_next_connect();
    wallet.reject_next_connect("User rejected the request.");
    let manager = ConnectionManager::new(wallet.clone(), "devnet");

    join!(manager.attempt_silent_connect(), async {
        manager.toggle_connect().await;
        silent_gate.approve();
    });

    assert_eq!(
        manager.state(),
        ConnectionState::Failed(AppError::Wallet("User rejected the request.".into()))
    );
    assert!(manager.identity().is_none());
}

#[tokio::test]
async fn test_disconnect_with_dedicated_capability() {
    let wallet = MockWallet::new("Phantom");
    let manager = ConnectionManager::new(wallet.clone(), "devnet");
    manager.toggle_connect().await;

    let state = manager.toggle_connect().await;

    assert_eq!(state, ConnectionState::Disconnected);
    assert!(manager.identity().is_none());
    assert_eq!(wallet.disconnect_calls(), 1);
    assert_eq!(wallet.reset_calls(), 0);
}

#[tokio::test]
async fn test_disconnect_falls_back_to_state_reset() {
    let wallet = MockWallet::new("Phantom").without_disconnect();
    let manager = ConnectionManager::new(wallet.clone(), "devnet");
    manager.toggle_connect().await;

    let state = manager.toggle_connect().await;

    assert_eq!(state, ConnectionState::Disconnected);
    assert!(manager.identity().is_none());
    assert_eq!(wallet.disconnect_calls(), 0);
    assert_eq!(wallet.reset_calls(), 1);
}

// ============================================================================
// SUBMISSION
// ============================================================================

#[tokio::test]
async fn test_submit_without_identity_makes_no_network_calls() {
    let program = CampaignProgram::default();
    let wallet = MockWallet::new("Phantom");
    let ledger = MockLedger::new(*program.program_id());
    let submitter = CampaignSubmitter::new(wallet.clone(), ledger.clone(), program);

    let err = submitter
        .submit_campaign(None, &CampaignDraft::new("X", "Y", "1"))
        .await
        .unwrap_err();

    assert_eq!(err, AppError::WalletNotConnected);
    assert_eq!(err.to_string(), "Wallet not connected");
    assert_eq!(ledger.network_calls(), 0);
    assert_eq!(wallet.sign_calls(), 0);
}

#[tokio::test]
async fn test_submit_builds_signed_transaction_for_derived_campaign() {
    // Arrange
    let wallet = MockWallet::new("Phantom");
    let (card, ledger) = setup(&wallet);
    card.on_toggle().await;
    fill(&card, "X", "Y", "1.5");

    // Act
    let submitted = card.on_submit().await.unwrap().unwrap();

    // Assert
    let program = CampaignProgram::default();
    let (campaign, _) = program.derive_campaign_address(&wallet.pubkey());
    assert_eq!(submitted.campaign_address, campaign.to_string());
    assert_eq!(submitted.target_lamports, 1_500_000_000);

    let sent = ledger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message.account_keys[0], wallet.pubkey());
    assert!(sent[0].verify().is_ok());
    assert_eq!(submitted.transaction_id, sent[0].signatures[0].to_string());
}

#[tokio::test]
async fn test_submit_success_clears_error() {
    let wallet = MockWallet::new("Phantom");
    let (card, _) = setup(&wallet);
    card.on_toggle().await;

    fill(&card, "X", "Y", "-1");
    card.on_submit().await;
    assert!(card.error().is_some());

    fill(&card, "X", "Y", "1");
    let submitted = card.on_submit().await.unwrap().unwrap();

    assert!(!submitted.transaction_id.is_empty());
    assert_eq!(card.error(), None);
    assert_eq!(card.view().last_transaction, Some(submitted));
}

#[tokio::test]
async fn test_submit_failure_sets_error_and_no_transaction() {
    let wallet = MockWallet::new("Phantom");
    let (card, ledger) = setup(&wallet);
    ledger.fail_send(LedgerError::InsufficientFunds);
    card.on_toggle().await;
    fill(&card, "X", "Y", "1");

    let result = card.on_submit().await.unwrap();

    assert_eq!(
        result,
        Err(AppError::Transaction("Insufficient funds for fee or rent".into()))
    );
    let view = card.view();
    assert_eq!(view.error.as_deref(), Some("Insufficient funds for fee or rent"));
    assert_eq!(view.status_text, "Error: Insufficient funds for fee or rent");
    assert_eq!(view.last_transaction, None);
}

#[tokio::test]
async fn test_second_campaign_for_same_creator_is_rejected() {
    let wallet = MockWallet::new("Phantom");
    let (card, ledger) = setup(&wallet);
    card.on_toggle().await;
    fill(&card, "X", "Y", "1");

    assert!(card.on_submit().await.unwrap().is_ok());
    let second = card.on_submit().await.unwrap();

    assert!(matches!(second, Err(AppError::Transaction(_))));
    assert_eq!(ledger.sent().len(), 1);
    assert!(card.view().last_transaction.is_none());
}

#[tokio::test]
async fn test_overlong_name_rejected_before_network() {
    let wallet = MockWallet::new("Phantom");
    let (card, ledger) = setup(&wallet);
    card.on_toggle().await;
    fill(&card, &"n".repeat(65), "Y", "1");

    let result = card.on_submit().await.unwrap();

    assert!(result.unwrap_err().is_input_error());
    assert_eq!(ledger.network_calls(), 0);
}

// ============================================================================
// END TO END
// ============================================================================

#[tokio::test]
async fn test_mount_connect_submit() {
    lib_core::logging::init_tracing();

    // Mount: silent connect is declined
    let wallet = MockWallet::new("Phantom");
    let (card, ledger) = setup(&wallet);
    card.on_mount().await;
    assert_eq!(card.view().status_text, "Disconnected");
    assert_eq!(card.view().button_label, "Connect");

    // Click: "Connecting.." while the prompt is open, then connected
    let gate = wallet.hold_next_connect();
    let ((), during) = join!(card.on_toggle(), async {
        let during = card.view();
        gate.approve();
        during
    });
    assert_eq!(during.status_text, "Connecting..");
    assert!(!during.form_visible);

    let view = card.view();
    assert_eq!(view.status_text, "Connected");
    assert_eq!(view.address_text, wallet.address());
    assert_eq!(view.network_text, "devnet");
    assert_eq!(view.button_label, "Disconnect");
    assert!(view.form_visible);

    // Submit
    fill(&card, "X", "Y", "1.5");
    let submitted = card.on_submit().await.unwrap().unwrap();
    assert!(!submitted.transaction_id.is_empty());
    assert_eq!(card.error(), None);
    assert_eq!(ledger.send_calls(), 1);

    let campaign = card
        .submitter()
        .fetch_campaign(&card.manager().identity().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.name, "X");
    assert_eq!(campaign.target_amount, 1_500_000_000);

    // Disconnect hides the form again
    card.on_toggle().await;
    let view = card.view();
    assert_eq!(view.status_text, "Disconnected");
    assert_eq!(view.address_text, "No Account Detected");
    assert_eq!(view.network_text, "No Chain Connected");
    assert!(!view.form_visible);
}
