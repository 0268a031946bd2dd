//! # Keypair Wallet
//!
//! A local keypair behind the wallet capabilities, for native tools and scripts that create
//! campaigns without a browser extension.
//!
//! Supported key formats:
//! - JSON byte array (Solana CLI `id.json`, 64 bytes, or a bare 32-byte secret)
//! - Base58 string of the same bytes

use async_trait::async_trait;
use parking_lot::Mutex;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::connector::{ConnectOptions, TransactionSigner, WalletConnector, WalletError};

/// Keypair-backed wallet. Clones share the key and the trust flag.
#[derive(Clone)]
pub struct KeypairWallet {
    keypair: Arc<Keypair>,
    trusted: Arc<Mutex<bool>>,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
            trusted: Arc::new(Mutex::new(false)),
        }
    }

    /// Pre-approve so silent connects succeed.
    pub fn trusted(self) -> Self {
        *self.trusted.lock() = true;
        self
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Load from a keypair file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            WalletError::InvalidKeypair(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }

    /// Parse JSON array or base58 key material.
    pub fn parse(contents: &str) -> Result<Self, WalletError> {
        let contents = contents.trim();
        let bytes: Vec<u8> = if contents.starts_with('[') {
            serde_json::from_str(contents)
                .map_err(|e| invalid(format!("Invalid JSON format: {}", e)))?
        } else {
            bs58::decode(contents)
                .into_vec()
                .map_err(|e| invalid(format!("Invalid base58: {}", e)))?
        };

        keypair_from_bytes(&bytes).map(Self::new)
    }
}

fn invalid(message: String) -> WalletError {
    WalletError::InvalidKeypair(message)
}

fn keypair_from_bytes(bytes: &[u8]) -> Result<Keypair, WalletError> {
    if bytes.len() != 32 && bytes.len() != 64 {
        return Err(invalid(format!("Expected 32 or 64 bytes, got {}", bytes.len())));
    }

    let mut secret = [0u8; 32];
    secret.copy_from_slice(&bytes[..32]);
    let keypair = Keypair::new_from_array(secret);

    // 64-byte files carry the public key too; it must match the secret.
    if bytes.len() == 64 && keypair.pubkey().as_ref() != &bytes[32..] {
        return Err(invalid("Public key does not match secret key".to_string()));
    }
    Ok(keypair)
}

#[async_trait(?Send)]
impl WalletConnector for KeypairWallet {
    fn name(&self) -> &str {
        "Keypair"
    }

    async fn connect(&self, options: ConnectOptions) -> Result<String, WalletError> {
        let mut trusted = self.trusted.lock();
        if options.only_if_trusted && !*trusted {
            return Err(WalletError::NotTrusted);
        }
        *trusted = true;
        Ok(self.keypair.pubkey().to_string())
    }

    fn supports_disconnect(&self) -> bool {
        true
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        *self.trusted.lock() = false;
        Ok(())
    }

    async fn reset_state(&self) -> Result<(), WalletError> {
        self.disconnect().await
    }
}

#[async_trait(?Send)]
impl TransactionSigner for KeypairWallet {
    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, WalletError> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[self.keypair.as_ref()], blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        debug!("Signed with {}", self.keypair.pubkey());
        Ok(transaction)
    }
}
