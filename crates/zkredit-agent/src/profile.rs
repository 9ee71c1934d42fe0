//! The worker's private profile.
//!
//! Nothing in here leaves the worker except through a proof's public
//! inputs: thresholds and the history commitment.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use zkredit_core::amount::Amount;

/// One settled transfer in the worker's private history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Settlement transaction hash.
    pub hash: String,
    pub amount: Amount,
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub monthly_income: Amount,
    pub transactions: Vec<TransactionRecord>,
    pub collateral_value: Amount,
    /// Content reference of the collateral's proof of title.
    pub collateral_title_ref: String,
    /// ISO country code of the collateral.
    pub country_code: String,
    /// Latitude, longitude.
    pub location: (f64, f64),
    pub employer_attestation: String,
}

impl Default for WorkerProfile {
    fn default() -> Self {
        Self {
            monthly_income: Amount::from_whole(800),
            transactions: Vec::new(),
            collateral_value: Amount::from_whole(15_000),
            collateral_title_ref: "ipfs://collateral-title".to_string(),
            country_code: "PH".to_string(),
            location: (14.5995, 120.9842),
            employer_attestation: "0x".to_string(),
        }
    }
}

impl WorkerProfile {
    pub fn add_transaction(&mut self, record: TransactionRecord) {
        self.transactions.push(record);
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Hex SHA-256 over the concatenated transaction hashes, in history
    /// order. An empty history commits to `SHA-256("empty")`.
    pub fn history_commitment(&self) -> String {
        let mut hasher = Sha256::new();
        if self.transactions.is_empty() {
            hasher.update(b"empty");
        } else {
            for tx in &self.transactions {
                hasher.update(tx.hash.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}
