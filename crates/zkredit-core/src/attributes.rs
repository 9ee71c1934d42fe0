//! Windowed remittance summaries and the banded attributes derived from them.
//!
//! Bands hide exact values from the credit engine: it only ever sees which
//! of four ordered ranges a metric falls into, plus coarse counts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::DecisionError;

/// Trailing-window aggregates for one worker.
///
/// Derived on demand from the event store; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Distinct calendar months (UTC) with at least one in-window remittance.
    pub months_with_activity: u32,
    /// Sum of gross amounts of in-window remittances.
    pub total_volume: Amount,
    /// Months since the oldest remittance in the whole history.
    pub account_age_months: u32,
    /// Number of in-window remittances.
    pub total_transactions: u32,
}

/// Total remitted volume bucket. Ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VolumeBand {
    #[serde(rename = "0-300")]
    UpTo300,
    #[serde(rename = "300-600")]
    From300To600,
    #[serde(rename = "600-900")]
    From600To900,
    #[serde(rename = "900+")]
    Over900,
}

impl VolumeBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpTo300 => "0-300",
            Self::From300To600 => "300-600",
            Self::From600To900 => "600-900",
            Self::Over900 => "900+",
        }
    }
}

impl fmt::Display for VolumeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Account age bucket. Ordered young to old.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "0-3m")]
    UnderThreeMonths,
    #[serde(rename = "3-6m")]
    ThreeToSixMonths,
    #[serde(rename = "6-12m")]
    SixToTwelveMonths,
    #[serde(rename = "12m+")]
    OverTwelveMonths,
}

impl AgeBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnderThreeMonths => "0-3m",
            Self::ThreeToSixMonths => "3-6m",
            Self::SixToTwelveMonths => "6-12m",
            Self::OverTwelveMonths => "12m+",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Privacy-preserving behavioral attributes fed to the credit engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZkAttributes {
    pub stable_remitter: bool,
    pub total_remitted_band: VolumeBand,
    pub account_age_band: AgeBand,
    pub months_with_activity: u32,
    pub total_transactions: u32,
}

impl ZkAttributes {
    /// Parse an untyped attribute payload, rejecting unknown fields and
    /// out-of-domain band labels.
    ///
    /// # Examples
    ///
    /// ```
    /// use zkredit_core::attributes::{VolumeBand, ZkAttributes};
    ///
    /// let payload = serde_json::json!({
    ///     "stable_remitter": true,
    ///     "total_remitted_band": "900+",
    ///     "account_age_band": "3-6m",
    ///     "months_with_activity": 4,
    ///     "total_transactions": 4,
    /// });
    /// let attrs = ZkAttributes::from_json(&payload).unwrap();
    /// assert_eq!(attrs.total_remitted_band, VolumeBand::Over900);
    /// ```
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DecisionError> {
        Self::deserialize(value).map_err(|e| DecisionError::MalformedAttributes(e.to_string()))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "stable_remitter": self.stable_remitter,
            "total_remitted_band": self.total_remitted_band.label(),
            "account_age_band": self.account_age_band.label(),
            "months_with_activity": self.months_with_activity,
            "total_transactions": self.total_transactions,
        })
    }
}
