//! Phantom Integration via wasm-bindgen
//!
//! JavaScript interop for the Phantom provider injected at `window.phantom.solana` (or the
//! legacy `window.solana`). Transactions cross the boundary as base64 wire bytes.

use async_trait::async_trait;
use lib_solana::{decode_transaction, encode_transaction, Transaction};
use lib_wallet::{ConnectOptions, TransactionSigner, WalletConnector, WalletError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(inline_js = "
function phantomProvider() {
    const provider = (window.phantom && window.phantom.solana) || window.solana;
    return provider && provider.isPhantom ? provider : null;
}

export function isPhantomInstalled() {
    return phantomProvider() !== null;
}

export async function phantomConnect(onlyIfTrusted) {
    const provider = phantomProvider();
    if (!provider) {
        throw new Error('Phantom wallet not found');
    }
    const resp = onlyIfTrusted
        ? await provider.connect({ onlyIfTrusted: true })
        : await provider.connect();
    return resp.publicKey.toString();
}

export function phantomSupportsDisconnect() {
    const provider = phantomProvider();
    return !!provider && typeof provider.disconnect === 'function';
}

export async function phantomDisconnect() {
    const provider = phantomProvider();
    if (provider) {
        await provider.disconnect();
    }
}

export function phantomResetState() {
    const provider = phantomProvider();
    if (provider && typeof provider.removeAllListeners === 'function') {
        provider.removeAllListeners();
    }
}

export async function phantomSignTransaction(base64Tx) {
    const provider = phantomProvider();
    if (!provider) {
        throw new Error('Phantom wallet not found');
    }
    if (typeof window.solanaWeb3 === 'undefined') {
        throw new Error('Solana Web3.js not loaded');
    }
    const txBuffer = Uint8Array.from(atob(base64Tx), c => c.charCodeAt(0));
    const tx = window.solanaWeb3.Transaction.from(txBuffer);
    const signedTx = await provider.signTransaction(tx);
    const serialized = signedTx.serialize();
    return btoa(String.fromCharCode.apply(null, serialized));
}
")]
extern "C" {
    fn isPhantomInstalled() -> bool;

    /// Resolves to the base58 public key
    #[wasm_bindgen(catch)]
    async fn phantomConnect(only_if_trusted: bool) -> Result<JsValue, JsValue>;

    fn phantomSupportsDisconnect() -> bool;

    #[wasm_bindgen(catch)]
    async fn phantomDisconnect() -> Result<JsValue, JsValue>;

    fn phantomResetState();

    /// Resolves to the signed transaction as base64
    #[wasm_bindgen(catch)]
    async fn phantomSignTransaction(base64_tx: &str) -> Result<JsValue, JsValue>;
}

/// Message of a rejected JS promise.
fn js_error_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(message) = err.as_string() {
        return message;
    }
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

pub const PHANTOM: &str = "Phantom";

/// Handle on the injected Phantom provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhantomWallet;

impl PhantomWallet {
    pub fn is_installed(&self) -> bool {
        isPhantomInstalled()
    }
}

#[async_trait(?Send)]
impl WalletConnector for PhantomWallet {
    fn name(&self) -> &str {
        PHANTOM
    }

    async fn connect(&self, options: ConnectOptions) -> Result<String, WalletError> {
        if !self.is_installed() {
            return Err(WalletError::NotInstalled(PHANTOM.to_string()));
        }

        match phantomConnect(options.only_if_trusted).await {
            Ok(value) => value
                .as_string()
                .ok_or_else(|| WalletError::InvalidAddress(format!("{:?}", value))),
            Err(_) if options.only_if_trusted => Err(WalletError::NotTrusted),
            Err(err) => Err(WalletError::Rejected(js_error_message(&err))),
        }
    }

    fn supports_disconnect(&self) -> bool {
        phantomSupportsDisconnect()
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        phantomDisconnect()
            .await
            .map(|_| ())
            .map_err(|err| WalletError::Disconnect(js_error_message(&err)))
    }

    async fn reset_state(&self) -> Result<(), WalletError> {
        phantomResetState();
        Ok(())
    }
}

#[async_trait(?Send)]
impl TransactionSigner for PhantomWallet {
    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError> {
        let encoded =
            encode_transaction(&transaction).map_err(|e| WalletError::Signing(e.to_string()))?;

        let signed = phantomSignTransaction(&encoded)
            .await
            .map_err(|err| WalletError::Signing(js_error_message(&err)))?
            .as_string()
            .ok_or_else(|| WalletError::Signing("Wallet returned a non-string transaction".to_string()))?;

        decode_transaction(&signed).map_err(|e| WalletError::Signing(e.to_string()))
    }
}
