//! # Centralized Error Handling
//!
//! This module defines the workspace-wide error type [`AppError`] used by the connection
//! manager, the campaign submitter and the UI state. It follows the `thiserror` pattern for
//! ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Input Errors** - problems the user can fix by editing the form
//!    - [`InvalidInput`](AppError::InvalidInput)
//!
//! 2. **Wallet Errors** - the wallet extension refused or is missing
//!    - [`WalletNotConnected`](AppError::WalletNotConnected) (raised before any network contact)
//!    - [`Wallet`](AppError::Wallet) / [`Signing`](AppError::Signing)
//!
//! 3. **Ledger Errors** - the RPC node or the program rejected the transaction
//!    - [`Rpc`](AppError::Rpc) / [`Transaction`](AppError::Transaction)
//!
//! 4. **Internal Errors** - configuration, encoding and everything unexpected
//!    - [`Config`](AppError::Config), [`Encoding`](AppError::Encoding),
//!      [`Decoding`](AppError::Decoding), [`Internal`](AppError::Internal)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn require_name(name: &str) -> Result<&str> {
//!     if name.trim().is_empty() {
//!         return Err(AppError::InvalidInput("Campaign name is required".to_string()));
//!     }
//!     Ok(name)
//! }
//! ```
//!
//! ## Error Conversion
//!
//! - `From<anyhow::Error>` - Convert anyhow errors to AppError
//! - `From<serde_json::Error>` - Convert JSON errors to AppError
//!
//! The wallet and ledger capability errors live next to their traits and convert into
//! `AppError` from there.

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Workspace-wide error type.
///
/// Each variant carries a descriptive `String` for context. The `#[error]` attribute
/// from `thiserror` provides the `Display` implementation that the UI shows verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A submission was attempted without a connected wallet identity.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// The wallet extension rejected a request (user denial, extension absent, locked).
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The wallet refused or failed to sign a transaction.
    #[error("Signing error: {0}")]
    Signing(String),

    /// RPC transport error (network, rate limit, node issues).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The transaction was rejected (simulation failure, program error, insufficient funds).
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Invalid user input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Data encoding error (base64, bincode serialization).
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Data decoding error (base58, base64, account layout).
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short machine-readable code for the variant.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::WalletNotConnected => "WalletNotConnected",
            AppError::Wallet(_) => "Wallet",
            AppError::Signing(_) => "Signing",
            AppError::Rpc(_) => "Rpc",
            AppError::Transaction(_) => "Transaction",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Encoding(_) => "Encoding",
            AppError::Decoding(_) => "Decoding",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For internal errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::WalletNotConnected => "Wallet not connected".to_string(),
            AppError::InvalidInput(msg)
            | AppError::Wallet(msg)
            | AppError::Signing(msg)
            | AppError::Transaction(msg) => msg.clone(),
            AppError::Rpc(_) => "Network temporarily unavailable".to_string(),
            AppError::Config(_) | AppError::Internal(_) | AppError::Encoding(_) | AppError::Decoding(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// Whether the user can fix this error by editing the form.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(AppError::WalletNotConnected.to_string(), "Wallet not connected");
        assert_eq!(
            AppError::InvalidInput("Target amount is required".to_string()).to_string(),
            "Invalid input: Target amount is required"
        );
    }

    #[test]
    fn test_user_message_hides_internal_details() {
        let err = AppError::Rpc("connection refused at 10.0.0.1".to_string());
        assert_eq!(err.user_message(), "Network temporarily unavailable");

        let err = AppError::Signing("User rejected the request.".to_string());
        assert_eq!(err.user_message(), "User rejected the request.");
    }

    #[test]
    fn test_codes() {
        assert_eq!(AppError::WalletNotConnected.code(), "WalletNotConnected");
        assert_eq!(AppError::Transaction(String::new()).code(), "Transaction");
        assert!(AppError::InvalidInput(String::new()).is_input_error());
        assert!(!AppError::Rpc(String::new()).is_input_error());
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err, AppError::Internal("boom".to_string()));
    }
}
