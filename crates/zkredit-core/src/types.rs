//! Ledger events, proof payloads, and settlement records.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::address::{AccountId, EvmAddress};
use crate::amount::Amount;

// ---------------------------------------------------------------------------
// Event identity
// ---------------------------------------------------------------------------

/// Unique identifier of a ledger event: `<prefix>_<16 hex chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Prefix for remittance event ids.
    pub const REMITTANCE_PREFIX: &'static str = "remit";
    /// Prefix for loan disbursement event ids.
    pub const LOAN_PREFIX: &'static str = "loan";

    /// Generate a fresh id with 64 random bits.
    pub fn generate(prefix: &str) -> Self {
        let mut bytes = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(format!("{prefix}_{}", hex::encode(bytes)))
    }

    /// Wrap an existing id (e.g. one replayed from another store).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Remittance events
// ---------------------------------------------------------------------------

/// A settled remittance, as recorded in the event ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceEvent {
    pub event_id: EventId,
    pub worker_id: String,
    pub receiver_id: String,
    /// Origin→destination label, e.g. `middle-east-to-philippines`.
    pub corridor: String,
    pub gross_amount: Amount,
    pub fee: Amount,
    pub net_amount: Amount,
    pub currency: String,
    /// Settlement transaction hash returned by the ledger.
    pub transaction_hash: String,
    /// Caller-supplied time of the remittance, ms since the Unix epoch.
    pub timestamp_ms: i64,
    pub ledger_topic: String,
}

/// Fields of a remittance before it is assigned an id and topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRemittance {
    pub worker_id: String,
    pub receiver_id: String,
    pub corridor: String,
    pub gross_amount: Amount,
    pub fee: Amount,
    pub net_amount: Amount,
    pub currency: String,
    pub transaction_hash: String,
    pub timestamp_ms: i64,
    /// Overrides the default ledger topic when set.
    pub ledger_topic: Option<String>,
}

impl RemittanceEvent {
    /// Assign a fresh event id and resolve the ledger topic.
    pub fn finalize(new: NewRemittance, default_topic: &str) -> Self {
        Self {
            event_id: EventId::generate(EventId::REMITTANCE_PREFIX),
            worker_id: new.worker_id,
            receiver_id: new.receiver_id,
            corridor: new.corridor,
            gross_amount: new.gross_amount,
            fee: new.fee,
            net_amount: new.net_amount,
            currency: new.currency,
            transaction_hash: new.transaction_hash,
            timestamp_ms: new.timestamp_ms,
            ledger_topic: new
                .ledger_topic
                .unwrap_or_else(|| default_topic.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Loan disbursement events
// ---------------------------------------------------------------------------

/// A loan paid out from a funding source to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDisbursementEvent {
    pub event_id: EventId,
    pub worker_id: String,
    /// Identity of the agent whose decision approved the loan.
    pub decision_agent_id: String,
    pub amount: Amount,
    /// Annual interest rate in basis points.
    pub interest_rate_bps: u32,
    pub tenure_months: u32,
    /// Account the loan was funded from.
    pub funding_source: String,
    pub transaction_hash: String,
    pub timestamp_ms: i64,
    pub corridor: String,
    pub notes: Option<String>,
}

/// Fields of a loan disbursement before it is assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoanDisbursement {
    pub worker_id: String,
    pub decision_agent_id: String,
    pub amount: Amount,
    pub interest_rate_bps: u32,
    pub tenure_months: u32,
    pub funding_source: String,
    pub transaction_hash: String,
    pub timestamp_ms: i64,
    pub corridor: String,
    pub notes: Option<String>,
}

impl LoanDisbursementEvent {
    /// Assign a fresh event id.
    pub fn finalize(new: NewLoanDisbursement) -> Self {
        Self {
            event_id: EventId::generate(EventId::LOAN_PREFIX),
            worker_id: new.worker_id,
            decision_agent_id: new.decision_agent_id,
            amount: new.amount,
            interest_rate_bps: new.interest_rate_bps,
            tenure_months: new.tenure_months,
            funding_source: new.funding_source,
            transaction_hash: new.transaction_hash,
            timestamp_ms: new.timestamp_ms,
            corridor: new.corridor,
            notes: new.notes,
        }
    }
}

// ---------------------------------------------------------------------------
// Proofs
// ---------------------------------------------------------------------------

/// The three proofs a loan application carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofKind {
    Income,
    CreditHistory,
    Collateral,
}

impl fmt::Display for ProofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Income => "income",
            Self::CreditHistory => "credit_history",
            Self::Collateral => "collateral",
        })
    }
}

/// Public inputs of a proof. Private witnesses never leave the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublicInputs {
    Income {
        minimum_income: Amount,
        timestamp_ms: i64,
    },
    CreditHistory {
        minimum_transactions: u32,
        time_range_months: u32,
        /// Hex SHA-256 commitment over the worker's transaction hashes.
        commitment: String,
    },
    Collateral {
        minimum_value: Amount,
        country_code: String,
    },
}

impl PublicInputs {
    pub fn kind(&self) -> ProofKind {
        match self {
            Self::Income { .. } => ProofKind::Income,
            Self::CreditHistory { .. } => ProofKind::CreditHistory,
            Self::Collateral { .. } => ProofKind::Collateral,
        }
    }
}

/// A request sent to the external proof provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRequest {
    pub worker_id: String,
    pub public_inputs: PublicInputs,
}

impl ProofRequest {
    pub fn kind(&self) -> ProofKind {
        self.public_inputs.kind()
    }
}

/// An opaque proof plus the public inputs actually used to produce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    pub kind: ProofKind,
    pub proof: Vec<u8>,
    pub public_inputs: PublicInputs,
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

/// Status reported by a settlement receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Success,
    /// Any non-success status code reported by the ledger.
    Failed(String),
}

impl ReceiptStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::Failed(code) => f.write_str(code),
        }
    }
}

/// Receipt returned by the ledger client for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub transaction_id: String,
    /// `0x`-prefixed hex transaction hash.
    pub transaction_hash: String,
    pub status: ReceiptStatus,
}

/// A payable contract invocation carrying receiver and amount parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    pub contract: EvmAddress,
    pub function: String,
    pub payer: AccountId,
    pub receiver: EvmAddress,
    /// Amount parameter, in smallest units.
    pub amount: u64,
    /// Value attached to the call, in smallest units.
    pub payable: u64,
    pub gas_limit: u64,
}

/// Outcome of a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub transaction_id: String,
    pub transaction_hash: String,
    pub status: ReceiptStatus,
    pub amount_units: u64,
    /// Canonical receiver address.
    pub receiver_address: EvmAddress,
}
