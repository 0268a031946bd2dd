//! Transaction wire format shared with wallets and RPC nodes: bincode, then standard base64.

use base64::{engine::general_purpose, Engine as _};
use lib_core::{AppError, Result};
use solana_sdk::transaction::Transaction;

/// Serialize a transaction for `signTransaction` or `sendTransaction`.
pub fn encode_transaction(transaction: &Transaction) -> Result<String> {
    let bytes = bincode::serialize(transaction)
        .map_err(|e| AppError::Encoding(format!("Failed to serialize transaction: {}", e)))?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

/// Parse a base64 transaction returned by a wallet.
pub fn decode_transaction(encoded: &str) -> Result<Transaction> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::Decoding(format!("Invalid base64 transaction: {}", e)))?;
    bincode::deserialize(&bytes)
        .map_err(|e| AppError::Decoding(format!("Failed to deserialize transaction: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{CampaignProgram, CreateCampaignArgs};
    use solana_sdk::{hash::Hash, pubkey::Pubkey};

    #[test]
    fn test_decode_what_we_encode() {
        let args = CreateCampaignArgs {
            name: "Well".to_string(),
            description: "Clean water".to_string(),
            target_amount: 1,
        };
        let (tx, _) = CampaignProgram::default().build_create_campaign_transaction(
            &Pubkey::new_unique(),
            &args,
            Hash::new_from_array([1; 32]),
        )
        .unwrap();

        let decoded = decode_transaction(&encode_transaction(&tx).unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode_transaction("%%%"), Err(AppError::Decoding(_))));
        assert!(matches!(decode_transaction("AAAA"), Err(AppError::Decoding(_))));
    }
}
