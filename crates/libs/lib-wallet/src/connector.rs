//! # Wallet Capabilities
//!
//! Two narrow traits over a wallet extension. Connecting and signing are separate
//! capabilities so the connection manager never sees signing and the submitter never drives
//! the connection lifecycle. The browser crate implements both for Phantom; native code uses
//! [`crate::keypair::KeypairWallet`].

use async_trait::async_trait;
use lib_core::AppError;
use solana_sdk::transaction::Transaction;
use thiserror::Error;

/// Errors reported by a wallet extension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No provider object is available (extension not installed or not injected yet).
    #[error("{0} wallet not found")]
    NotInstalled(String),

    /// Silent connect refused because the site has not been approved before.
    #[error("Wallet has not approved this site")]
    NotTrusted,

    /// The user dismissed or denied a prompt.
    #[error("{0}")]
    Rejected(String),

    /// The provider returned an address that is not a valid public key.
    #[error("Wallet returned an invalid address: {0}")]
    InvalidAddress(String),

    /// Signing was denied or failed.
    #[error("{0}")]
    Signing(String),

    /// Local key material could not be loaded.
    #[error("Invalid keypair: {0}")]
    InvalidKeypair(String),

    /// Disconnect or state reset failed.
    #[error("Failed to disconnect wallet: {0}")]
    Disconnect(String),
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Signing(msg) => AppError::Signing(msg),
            other => AppError::Wallet(other.to_string()),
        }
    }
}

/// Options for [`WalletConnector::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectOptions {
    /// Only succeed if the user approved this site before; never open a prompt.
    pub only_if_trusted: bool,
}

impl ConnectOptions {
    pub fn interactive() -> Self {
        Self { only_if_trusted: false }
    }

    pub fn silent() -> Self {
        Self { only_if_trusted: true }
    }
}

/// Connection lifecycle of a wallet extension.
#[async_trait(?Send)]
pub trait WalletConnector {
    /// Provider name, e.g. "Phantom".
    fn name(&self) -> &str;

    /// Request the account; resolves to its base58 public address.
    async fn connect(&self, options: ConnectOptions) -> Result<String, WalletError>;

    /// Whether [`disconnect`](WalletConnector::disconnect) is available.
    fn supports_disconnect(&self) -> bool;

    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Forget the connection without a dedicated disconnect call.
    async fn reset_state(&self) -> Result<(), WalletError>;
}

/// Transaction signing by the wallet holding the fee payer key.
#[async_trait(?Send)]
pub trait TransactionSigner {
    /// Return `transaction` with the wallet's signature filled in.
    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_app_error() {
        assert_eq!(
            AppError::from(WalletError::Rejected("User rejected the request.".into())),
            AppError::Wallet("User rejected the request.".into())
        );
        assert_eq!(
            AppError::from(WalletError::Signing("Declined".into())),
            AppError::Signing("Declined".into())
        );
        assert_eq!(
            AppError::from(WalletError::NotInstalled("Phantom".into())).user_message(),
            "Phantom wallet not found"
        );
    }

    #[test]
    fn test_connect_options() {
        assert!(ConnectOptions::silent().only_if_trusted);
        assert!(!ConnectOptions::interactive().only_if_trusted);
        assert_eq!(ConnectOptions::default(), ConnectOptions::interactive());
    }
}
