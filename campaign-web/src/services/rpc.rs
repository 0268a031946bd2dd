//! JSON-RPC ledger over `fetch`.
//!
//! The browser cannot use the native `solana-client`, so this speaks the node's JSON-RPC
//! directly with gloo-net. Confirmation polls `getSignatureStatuses` until the signature
//! reaches the configured commitment, and gives up once the block height passes the
//! blockhash's last valid height.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use lib_core::{Commitment, Config};
use lib_solana::{encode_transaction, Hash, LedgerError, LedgerRpc, Pubkey, Signature, Transaction};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::Cell;
use std::str::FromStr;

const POLL_INTERVAL_MS: u32 = 500;

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
    last_valid_block_height: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    err: Option<Value>,
    confirmation_status: Option<String>,
}

#[derive(Deserialize)]
struct AccountInfo {
    /// `[data, "base64"]`
    data: (String, String),
}

pub struct JsonRpcLedger {
    url: String,
    commitment: Commitment,
    next_id: Cell<u64>,
    last_valid_block_height: Cell<Option<u64>>,
}

impl JsonRpcLedger {
    pub fn new(url: impl Into<String>, commitment: Commitment) -> Self {
        Self {
            url: url.into(),
            commitment,
            next_id: Cell::new(1),
            last_valid_block_height: Cell::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rpc_url(), config.commitment)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, LedgerError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        log::debug!("[JsonRpcLedger] {} -> {}", method, self.url);

        let response = Request::post(&self.url)
            .json(&payload)
            .map_err(|e| LedgerError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(LedgerError::Transport(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(LedgerError::from_message(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }
        body.result
            .ok_or_else(|| LedgerError::InvalidResponse(format!("{} returned no result", method)))
    }

    async fn block_height(&self) -> Result<u64, LedgerError> {
        self.call("getBlockHeight", json!([{ "commitment": self.commitment.as_str() }]))
            .await
    }

    async fn signature_status(&self, signature: &Signature) -> Result<Option<SignatureStatus>, LedgerError> {
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", json!([[signature.to_string()]]))
            .await?;
        Ok(statuses.value.into_iter().next().flatten())
    }
}

fn reached(status: Option<&str>, commitment: Commitment) -> bool {
    status
        .and_then(|s| Commitment::from_str(s).ok())
        .is_some_and(|level| level >= commitment)
}

/// Decision after one confirmation poll; `None` keeps polling.
///
/// `block_height` is only consulted while the signature is still unknown to the node.
fn poll_outcome(
    status: Option<&SignatureStatus>,
    block_height: Option<u64>,
    last_valid_block_height: Option<u64>,
    commitment: Commitment,
) -> Option<Result<(), LedgerError>> {
    match status {
        Some(status) => {
            if let Some(err) = &status.err {
                return Some(Err(LedgerError::from_message(err.to_string())));
            }
            reached(status.confirmation_status.as_deref(), commitment).then_some(Ok(()))
        }
        None => match (block_height, last_valid_block_height) {
            (Some(height), Some(last_valid)) if height > last_valid => {
                Some(Err(LedgerError::BlockhashExpired))
            }
            _ => None,
        },
    }
}

#[async_trait(?Send)]
impl LedgerRpc for JsonRpcLedger {
    fn commitment(&self) -> Commitment {
        self.commitment
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        let latest: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([{ "commitment": self.commitment.as_str() }]))
            .await?;

        self.last_valid_block_height
            .set(Some(latest.value.last_valid_block_height));
        Hash::from_str(&latest.value.blockhash)
            .map_err(|e| LedgerError::InvalidResponse(format!("Invalid blockhash: {}", e)))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError> {
        let encoded =
            encode_transaction(transaction).map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

        let sent: String = self
            .call(
                "sendTransaction",
                json!([encoded, {
                    "encoding": "base64",
                    "preflightCommitment": self.commitment.as_str(),
                }]),
            )
            .await?;
        let signature = Signature::from_str(&sent)
            .map_err(|e| LedgerError::InvalidResponse(format!("Invalid signature: {}", e)))?;
        log::info!("[JsonRpcLedger] Sent {}", signature);

        let last_valid = self.last_valid_block_height.get();
        loop {
            let status = self.signature_status(&signature).await?;
            let block_height = match (&status, last_valid) {
                (None, Some(_)) => Some(self.block_height().await?),
                _ => None,
            };

            if let Some(outcome) =
                poll_outcome(status.as_ref(), block_height, last_valid, self.commitment)
            {
                return outcome.map(|()| signature);
            }

            TimeoutFuture::new(POLL_INTERVAL_MS).await;
        }
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        let info: WithContext<Option<AccountInfo>> = self
            .call(
                "getAccountInfo",
                json!([address.to_string(), {
                    "encoding": "base64",
                    "commitment": self.commitment.as_str(),
                }]),
            )
            .await?;

        info.value
            .map(|account| {
                general_purpose::STANDARD
                    .decode(account.data.0)
                    .map_err(|e| LedgerError::InvalidResponse(format!("Invalid account data: {}", e)))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reached_commitment() {
        assert!(reached(Some("processed"), Commitment::Processed));
        assert!(reached(Some("finalized"), Commitment::Confirmed));
        assert!(!reached(Some("processed"), Commitment::Confirmed));
        assert!(!reached(None, Commitment::Processed));
    }

    fn status(err: Option<Value>, confirmation: Option<&str>) -> SignatureStatus {
        SignatureStatus {
            err,
            confirmation_status: confirmation.map(str::to_string),
        }
    }

    #[test]
    fn test_poll_confirms_at_commitment() {
        let processed = status(None, Some("processed"));
        assert!(matches!(
            poll_outcome(Some(&processed), None, Some(100), Commitment::Processed),
            Some(Ok(()))
        ));
        assert!(poll_outcome(Some(&processed), None, Some(100), Commitment::Confirmed).is_none());
    }

    #[test]
    fn test_poll_surfaces_transaction_error() {
        let failed = status(
            Some(json!({ "InstructionError": [0, { "Custom": 0 }] })),
            Some("processed"),
        );

        let outcome = poll_outcome(Some(&failed), None, Some(100), Commitment::Processed);

        match outcome {
            Some(Err(LedgerError::Rejected(message))) => assert!(message.contains("InstructionError")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_poll_expires_past_last_valid_height() {
        assert!(matches!(
            poll_outcome(None, Some(101), Some(100), Commitment::Processed),
            Some(Err(LedgerError::BlockhashExpired))
        ));
    }

    #[test]
    fn test_poll_keeps_waiting_for_unknown_signature() {
        assert!(poll_outcome(None, Some(100), Some(100), Commitment::Processed).is_none());
        assert!(poll_outcome(None, Some(99), Some(100), Commitment::Processed).is_none());
        assert!(poll_outcome(None, None, None, Commitment::Processed).is_none());

        let seen = status(None, None);
        assert!(poll_outcome(Some(&seen), Some(500), Some(100), Commitment::Processed).is_none());
    }

    #[test]
    fn test_parse_status_response() {
        let body = r#"{"jsonrpc":"2.0","result":{"context":{"slot":1},"value":[{"slot":1,"confirmations":0,"err":null,"confirmationStatus":"processed"}]},"id":1}"#;
        let parsed: RpcResponse<WithContext<Vec<Option<SignatureStatus>>>> =
            serde_json::from_str(body).unwrap();
        let status = parsed.result.unwrap().value.into_iter().next().flatten().unwrap();
        assert!(status.err.is_none());
        assert_eq!(status.confirmation_status.as_deref(), Some("processed"));
    }
}
