//! # In-Memory Fakes
//!
//! Scriptable wallet and ledger for tests and demos. Both are cheap to clone; clones share
//! state, so a test can hand one copy to the code under test and inspect the other.
//!
//! [`MockLedger`] emulates the campaign program: a confirmed `create_campaign` transaction
//! initializes the campaign account, and a second one for the same creator is rejected.

use async_trait::async_trait;
use futures::channel::oneshot;
use lib_core::Commitment;
use lib_solana::campaign::{CampaignAccount, CreateCampaignArgs};
use lib_solana::ledger::{LedgerError, LedgerRpc};
use parking_lot::Mutex;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::connector::{ConnectOptions, TransactionSigner, WalletConnector, WalletError};

// ============================================================================
// WALLET
// ============================================================================

#[derive(Default)]
struct WalletState {
    trusted: bool,
    supports_disconnect: bool,
    scripted: VecDeque<Result<(), WalletError>>,
    gates: VecDeque<oneshot::Receiver<Result<(), WalletError>>>,
    disconnect_gates: VecDeque<oneshot::Receiver<Result<(), WalletError>>>,
    reject_signing: Option<String>,
    interactive_calls: usize,
    silent_calls: usize,
    disconnect_calls: usize,
    reset_calls: usize,
    sign_calls: usize,
}

/// Wallet extension fake backed by a real keypair.
#[derive(Clone)]
pub struct MockWallet {
    name: String,
    keypair: Arc<Keypair>,
    state: Arc<Mutex<WalletState>>,
}

/// Holds the next connect (or disconnect) call open until released.
pub struct CallGate {
    sender: oneshot::Sender<Result<(), WalletError>>,
}

impl CallGate {
    pub fn approve(self) {
        let _ = self.sender.send(Ok(()));
    }

    pub fn reject(self, message: &str) {
        let _ = self.sender.send(Err(WalletError::Rejected(message.to_string())));
    }
}

impl MockWallet {
    /// Untrusted wallet with a fresh keypair and a disconnect capability.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            keypair: Arc::new(Keypair::new()),
            state: Arc::new(Mutex::new(WalletState {
                supports_disconnect: true,
                ..WalletState::default()
            })),
        }
    }

    /// Whether silent connects succeed.
    pub fn trusted(self, trusted: bool) -> Self {
        self.state.lock().trusted = trusted;
        self
    }

    /// Drop the disconnect capability so the manager falls back to a state reset.
    pub fn without_disconnect(self) -> Self {
        self.state.lock().supports_disconnect = false;
        self
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn address(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    /// Fail the next connect call (silent or interactive) with a user rejection.
    pub fn reject_next_connect(&self, message: &str) {
        self.state
            .lock()
            .scripted
            .push_back(Err(WalletError::Rejected(message.to_string())));
    }

    /// Park the next connect call until the returned gate is released.
    pub fn hold_next_connect(&self) -> CallGate {
        let (sender, receiver) = oneshot::channel();
        self.state.lock().gates.push_back(receiver);
        CallGate { sender }
    }

    /// Park the next disconnect or state reset until the returned gate is released.
    pub fn hold_next_disconnect(&self) -> CallGate {
        let (sender, receiver) = oneshot::channel();
        self.state.lock().disconnect_gates.push_back(receiver);
        CallGate { sender }
    }

    /// Refuse every signing request with `message`.
    pub fn reject_signing(&self, message: &str) {
        self.state.lock().reject_signing = Some(message.to_string());
    }

    /// Interactive connect calls.
    pub fn connect_calls(&self) -> usize {
        self.state.lock().interactive_calls
    }

    pub fn silent_connect_calls(&self) -> usize {
        self.state.lock().silent_calls
    }

    pub fn disconnect_calls(&self) -> usize {
        self.state.lock().disconnect_calls
    }

    pub fn reset_calls(&self) -> usize {
        self.state.lock().reset_calls
    }

    pub fn sign_calls(&self) -> usize {
        self.state.lock().sign_calls
    }

    async fn finish_disconnect(
        &self,
        gate: Option<oneshot::Receiver<Result<(), WalletError>>>,
    ) -> Result<(), WalletError> {
        if let Some(receiver) = gate {
            receiver
                .await
                .unwrap_or_else(|_| Err(WalletError::Disconnect("Request cancelled".to_string())))
                .map_err(|e| WalletError::Disconnect(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl WalletConnector for MockWallet {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self, options: ConnectOptions) -> Result<String, WalletError> {
        let (gate, scripted) = {
            let mut state = self.state.lock();
            if options.only_if_trusted {
                state.silent_calls += 1;
            } else {
                state.interactive_calls += 1;
            }
            let gate = state.gates.pop_front();
            let scripted = if gate.is_none() { state.scripted.pop_front() } else { None };
            (gate, scripted)
        };

        let outcome = match (gate, scripted) {
            (Some(receiver), _) => receiver
                .await
                .unwrap_or_else(|_| Err(WalletError::Rejected("Request cancelled".to_string()))),
            (None, Some(scripted)) => scripted,
            (None, None) => {
                if options.only_if_trusted && !self.state.lock().trusted {
                    Err(WalletError::NotTrusted)
                } else {
                    Ok(())
                }
            }
        };

        outcome?;
        self.state.lock().trusted = true;
        Ok(self.address())
    }

    fn supports_disconnect(&self) -> bool {
        self.state.lock().supports_disconnect
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        let gate = {
            let mut state = self.state.lock();
            state.disconnect_calls += 1;
            state.disconnect_gates.pop_front()
        };
        self.finish_disconnect(gate).await
    }

    async fn reset_state(&self) -> Result<(), WalletError> {
        let gate = {
            let mut state = self.state.lock();
            state.reset_calls += 1;
            state.disconnect_gates.pop_front()
        };
        self.finish_disconnect(gate).await
    }
}

#[async_trait(?Send)]
impl TransactionSigner for MockWallet {
    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, WalletError> {
        let rejection = {
            let mut state = self.state.lock();
            state.sign_calls += 1;
            state.reject_signing.clone()
        };
        if let Some(message) = rejection {
            return Err(WalletError::Signing(message));
        }

        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[self.keypair.as_ref()], blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(transaction)
    }
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Default)]
struct LedgerState {
    blockhash: Hash,
    fail_blockhash: Option<LedgerError>,
    fail_send: Option<LedgerError>,
    fail_account: Option<LedgerError>,
    blockhash_calls: usize,
    send_calls: usize,
    account_calls: usize,
    sent: Vec<Transaction>,
    accounts: HashMap<Pubkey, Vec<u8>>,
}

/// Ledger fake that verifies signatures and emulates the campaign program.
#[derive(Clone)]
pub struct MockLedger {
    program_id: Pubkey,
    state: Arc<Mutex<LedgerState>>,
}

impl MockLedger {
    /// Ledger hosting the campaign program at `program_id`.
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            state: Arc::new(Mutex::new(LedgerState {
                blockhash: Hash::new_from_array([42; 32]),
                ..LedgerState::default()
            })),
        }
    }

    pub fn fail_blockhash(&self, err: LedgerError) {
        self.state.lock().fail_blockhash = Some(err);
    }

    pub fn fail_send(&self, err: LedgerError) {
        self.state.lock().fail_send = Some(err);
    }

    /// Fail every account lookup with `err`.
    pub fn fail_account(&self, err: LedgerError) {
        self.state.lock().fail_account = Some(err);
    }

    /// Total RPC calls of any kind.
    pub fn network_calls(&self) -> usize {
        let state = self.state.lock();
        state.blockhash_calls + state.send_calls + state.account_calls
    }

    pub fn send_calls(&self) -> usize {
        self.state.lock().send_calls
    }

    /// Transactions accepted so far.
    pub fn sent(&self) -> Vec<Transaction> {
        self.state.lock().sent.clone()
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.state.lock().accounts.insert(address, data);
    }

    fn execute(&self, state: &mut LedgerState, transaction: &Transaction) -> Result<(), LedgerError> {
        let message = &transaction.message;
        for ix in &message.instructions {
            let key = |position: usize| {
                ix.accounts
                    .get(position)
                    .and_then(|index| message.account_keys.get(*index as usize))
                    .copied()
                    .ok_or_else(|| LedgerError::Rejected("missing account".to_string()))
            };

            let program = message
                .account_keys
                .get(ix.program_id_index as usize)
                .copied()
                .ok_or_else(|| LedgerError::Rejected("missing program".to_string()))?;
            if program != self.program_id {
                continue;
            }

            let args = CreateCampaignArgs::try_from_data(&ix.data)
                .map_err(|e| LedgerError::Rejected(e.to_string()))?;
            let campaign = key(0)?;
            let creator = key(1)?;

            if state.accounts.contains_key(&campaign) {
                return Err(LedgerError::Rejected(format!(
                    "Allocate: account Address {{ address: {}, base: None }} already in use",
                    campaign
                )));
            }

            let account = CampaignAccount {
                creator,
                name: args.name,
                description: args.description,
                target_amount: args.target_amount,
                current_funds: 0,
            };
            let data = account
                .to_bytes()
                .map_err(|e| LedgerError::Rejected(e.to_string()))?;
            state.accounts.insert(campaign, data);
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl LedgerRpc for MockLedger {
    fn commitment(&self) -> Commitment {
        Commitment::Processed
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        let mut state = self.state.lock();
        state.blockhash_calls += 1;
        match &state.fail_blockhash {
            Some(err) => Err(err.clone()),
            None => Ok(state.blockhash),
        }
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError> {
        let mut state = self.state.lock();
        state.send_calls += 1;
        if let Some(err) = &state.fail_send {
            return Err(err.clone());
        }
        if transaction.message.recent_blockhash != state.blockhash {
            return Err(LedgerError::BlockhashExpired);
        }
        transaction
            .verify()
            .map_err(|e| LedgerError::Rejected(format!("Signature verification failed: {}", e)))?;

        self.execute(&mut state, transaction)?;
        state.sent.push(transaction.clone());

        transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| LedgerError::Rejected("Transaction has no signatures".to_string()))
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        let mut state = self.state.lock();
        state.account_calls += 1;
        if let Some(err) = &state.fail_account {
            return Err(err.clone());
        }
        Ok(state.accounts.get(address).cloned())
    }
}
