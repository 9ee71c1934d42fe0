//! Protocol constants. All monetary values in smallest units (1 unit = 10^8).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest units per whole settlement-currency unit.
pub const UNIT: u64 = 100_000_000;

/// Basis-point denominator (10,000 bps = 100%).
pub const BPS_PRECISION: u64 = 10_000;

/// Remittance fee rate: 0.7% of the gross amount.
pub const REMITTANCE_FEE_BPS: u64 = 70;

/// Floor applied to the remittance fee: 0.50 units.
pub const MIN_REMITTANCE_FEE: u64 = UNIT / 2;

/// Length of one "month" used by windowed summaries, in milliseconds.
///
/// Calendar months are approximated as fixed 30-day periods.
pub const MONTH_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Default trailing window for remittance summaries, in months.
pub const ZK_INPUT_WINDOW_MONTHS: u32 = 6;

/// Months with activity at or above which a worker is a stable remitter.
pub const STABLE_REMITTER_MIN_MONTHS: u32 = 3;

/// Repayment term shared by every credit decision.
pub const REPAYMENT_MONTHS: u32 = 4;

/// Default hard cap for a single remittance, in whole units.
pub const DEFAULT_REMITTANCE_CAP: u64 = 5_000;

/// Default ledger topic label stamped on remittance events.
pub const DEFAULT_LEDGER_TOPIC: &str = "0.0.920393";

/// Default corridor for workers that do not configure one.
pub const DEFAULT_CORRIDOR: &str = "middle-east-to-philippines";

/// Currency code used when a request does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Gas limit attached to contract-mediated payments.
pub const DEFAULT_GAS_LIMIT: u64 = 600_000;

/// Contract function invoked for contract-mediated payments.
pub const PAYMENT_FUNCTION: &str = "pay";

/// Default timeout for ledger settlement calls, in seconds.
pub const DEFAULT_SETTLEMENT_TIMEOUT_SECS: u64 = 30;

/// Default timeout for proof generation and verification, in seconds.
pub const DEFAULT_PROOF_TIMEOUT_SECS: u64 = 60;

/// Minimum monthly income proven for a loan application, in whole units.
pub const MIN_PROVEN_INCOME: u64 = 500;

/// Minimum number of prior transactions proven for a loan application.
pub const MIN_PROVEN_TRANSACTIONS: u32 = 1;

/// Minimum collateral value proven for a loan application, in whole units.
pub const MIN_PROVEN_COLLATERAL: u64 = 10_000;

/// Time range covered by the credit-history proof, in months.
pub const CREDIT_HISTORY_RANGE_MONTHS: u32 = 6;

/// Ledger network the agent settles on.
///
/// # Examples
///
/// ```
/// use zkredit_core::constants::LedgerNetwork;
/// assert_eq!(LedgerNetwork::default(), LedgerNetwork::Testnet);
/// assert_eq!("previewnet".parse::<LedgerNetwork>(), Ok(LedgerNetwork::Previewnet));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerNetwork {
    /// Production network.
    Mainnet,
    /// Public test network.
    #[default]
    Testnet,
    /// Preview network for upcoming releases.
    Previewnet,
}

impl LedgerNetwork {
    /// Lowercase network name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Previewnet => "previewnet",
        }
    }
}

impl fmt::Display for LedgerNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "previewnet" => Ok(Self::Previewnet),
            other => Err(other.to_string()),
        }
    }
}
