//! Decision strategies and their constant parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use zkredit_core::amount::Amount;
use zkredit_core::constants::REPAYMENT_MONTHS;

/// Amount every base and fallback decision approves.
pub const BASE_LOAN_AMOUNT: Amount = Amount::from_whole(150);

/// Upper bound on what the attribute-aware strategy approves.
pub const DEFAULT_LOAN_CAP: Amount = Amount::from_whole(200);

/// 10% annual interest.
pub const STANDARD_RATE_BPS: u32 = 1_000;

/// 9% annual interest for stable remitters.
pub const STABLE_REMITTER_RATE_BPS: u32 = 900;

/// Which decision strategy an engine runs.
///
/// The fallback is also what every other strategy degrades to when its
/// inputs are unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStrategy {
    /// Fixed offer regardless of request size or attributes.
    Base,
    /// Offer shaped by the requested amount and the stable-remitter flag.
    #[default]
    AttributeAware,
    /// Conservative fixed offer that cannot fail.
    Fallback,
}

impl DecisionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::AttributeAware => "attribute_aware",
            Self::Fallback => "fallback",
        }
    }

    /// Identity recorded as the decision agent on disbursements.
    pub fn agent_id(&self) -> &'static str {
        match self {
            Self::Base => "credit-agent-base",
            Self::AttributeAware => "credit-agent-attributes",
            Self::Fallback => "credit-agent-fallback",
        }
    }
}

impl fmt::Display for DecisionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "base" => Ok(Self::Base),
            "attribute_aware" | "attributes" => Ok(Self::AttributeAware),
            "fallback" => Ok(Self::Fallback),
            other => Err(format!("unknown decision strategy '{other}'")),
        }
    }
}

/// Constant parameters shared by the strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    pub base_amount: Amount,
    pub loan_cap: Amount,
    pub standard_rate_bps: u32,
    pub stable_rate_bps: u32,
    pub repayment_months: u32,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            base_amount: BASE_LOAN_AMOUNT,
            loan_cap: DEFAULT_LOAN_CAP,
            standard_rate_bps: STANDARD_RATE_BPS,
            stable_rate_bps: STABLE_REMITTER_RATE_BPS,
            repayment_months: REPAYMENT_MONTHS,
        }
    }
}
