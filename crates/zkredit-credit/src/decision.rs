//! Decision outputs and proof verification results.

use serde::{Deserialize, Serialize};

use zkredit_core::amount::Amount;
use zkredit_core::error::DecisionError;
use zkredit_core::types::ProofKind;

use crate::policy::DecisionStrategy;

/// Outcome of a loan evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditDecision {
    pub approved: bool,
    pub max_amount: Amount,
    pub interest_rate_bps: u32,
    pub reason: String,
    /// Machine-readable account of how the decision was reached.
    pub analysis: serde_json::Value,
    pub repayment_months: u32,
    /// Strategy that actually produced this decision.
    pub strategy: DecisionStrategy,
}

impl CreditDecision {
    /// Installment owed each month over the repayment term.
    pub fn installment(&self) -> Amount {
        self.max_amount.split(self.repayment_months)
    }
}

/// Result of verifying one proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofCheck {
    pub kind: ProofKind,
    pub verified: bool,
}

/// Verification results for a loan application's proofs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub checks: Vec<ProofCheck>,
}

impl VerificationReport {
    pub fn new(checks: Vec<ProofCheck>) -> Self {
        Self { checks }
    }

    /// A report in which every kind verified.
    pub fn all_verified(kinds: &[ProofKind]) -> Self {
        Self::new(
            kinds
                .iter()
                .map(|&kind| ProofCheck { kind, verified: true })
                .collect(),
        )
    }

    pub fn verified_count(&self) -> usize {
        self.checks.iter().filter(|c| c.verified).count()
    }

    /// Reject reports that are empty, repeat a kind, or carry a failed proof.
    pub fn validate(&self) -> Result<(), DecisionError> {
        if self.checks.is_empty() {
            return Err(DecisionError::MalformedVerification("no proof results".into()));
        }
        for (i, check) in self.checks.iter().enumerate() {
            if self.checks[..i].iter().any(|c| c.kind == check.kind) {
                return Err(DecisionError::MalformedVerification(format!(
                    "duplicate {} result",
                    check.kind
                )));
            }
            if !check.verified {
                return Err(DecisionError::MalformedVerification(format!(
                    "{} proof did not verify",
                    check.kind
                )));
            }
        }
        Ok(())
    }
}
