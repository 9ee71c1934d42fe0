//! Credit decision engine.
//!
//! [`CreditDecisionEngine::evaluate`] always returns a decision. The
//! selected strategy may reject its inputs with a [`DecisionError`]; the
//! engine logs the rejection and answers with the fallback decision instead.

use serde_json::json;
use tracing::{debug, warn};

use zkredit_core::amount::Amount;
use zkredit_core::attributes::ZkAttributes;
use zkredit_core::constants::DEFAULT_CORRIDOR;
use zkredit_core::error::DecisionError;

use crate::decision::{CreditDecision, VerificationReport};
use crate::policy::{DecisionPolicy, DecisionStrategy};

/// Runs one [`DecisionStrategy`] under a [`DecisionPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditDecisionEngine {
    strategy: DecisionStrategy,
    policy: DecisionPolicy,
}

impl CreditDecisionEngine {
    pub fn new(strategy: DecisionStrategy) -> Self {
        Self::with_policy(strategy, DecisionPolicy::default())
    }

    pub fn with_policy(strategy: DecisionStrategy, policy: DecisionPolicy) -> Self {
        Self { strategy, policy }
    }

    pub fn strategy(&self) -> DecisionStrategy {
        self.strategy
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Decide a loan request. Never fails.
    pub fn evaluate(
        &self,
        credit_score: u16,
        requested: Amount,
        verification: &VerificationReport,
        attributes: Option<&ZkAttributes>,
    ) -> CreditDecision {
        let outcome = match self.strategy {
            DecisionStrategy::Base => self.base(credit_score, requested, verification),
            DecisionStrategy::AttributeAware => {
                self.attribute_aware(credit_score, requested, verification, attributes)
            }
            DecisionStrategy::Fallback => Ok(self.fallback()),
        };

        match outcome {
            Ok(decision) => {
                debug!(
                    strategy = %decision.strategy,
                    approved = decision.approved,
                    amount = %decision.max_amount,
                    rate_bps = decision.interest_rate_bps,
                    "credit decision"
                );
                decision
            }
            Err(e) => {
                warn!(strategy = %self.strategy, error = %e, "strategy rejected inputs, using fallback");
                self.fallback()
            }
        }
    }

    /// Decide a loan request whose attributes arrive as an untyped payload.
    ///
    /// Unknown fields or out-of-domain band labels route to the fallback.
    pub fn evaluate_payload(
        &self,
        credit_score: u16,
        requested: Amount,
        verification: &VerificationReport,
        attributes: Option<&serde_json::Value>,
    ) -> CreditDecision {
        let parsed = match attributes.map(ZkAttributes::from_json).transpose() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "attribute payload rejected, using fallback");
                return self.fallback();
            }
        };
        self.evaluate(credit_score, requested, verification, parsed.as_ref())
    }

    fn base(
        &self,
        credit_score: u16,
        requested: Amount,
        verification: &VerificationReport,
    ) -> Result<CreditDecision, DecisionError> {
        verification.validate()?;
        check_requested(requested)?;

        let amount = self.policy.base_amount;
        let rate = self.policy.standard_rate_bps;
        Ok(CreditDecision {
            approved: true,
            max_amount: amount,
            interest_rate_bps: rate,
            reason: format!(
                "Standard offer: {amount} over {} months at {}% APR.",
                self.policy.repayment_months,
                percent(rate)
            ),
            analysis: json!({
                "strategy": DecisionStrategy::Base.as_str(),
                "credit_score": credit_score,
                "requested_amount": requested.to_string(),
                "verification": verification,
                "repayment_plan": self.plan(amount),
            }),
            repayment_months: self.policy.repayment_months,
            strategy: DecisionStrategy::Base,
        })
    }

    fn attribute_aware(
        &self,
        credit_score: u16,
        requested: Amount,
        verification: &VerificationReport,
        attributes: Option<&ZkAttributes>,
    ) -> Result<CreditDecision, DecisionError> {
        verification.validate()?;
        check_requested(requested)?;
        let attributes = attributes.ok_or(DecisionError::MissingAttributes)?;

        let amount = requested.min(self.policy.loan_cap);
        let stable = attributes.stable_remitter;
        let (rate, reason, notes) = if stable {
            (
                self.policy.stable_rate_bps,
                "Corridor offer with stable remittance discount for borrowers with verified histories.",
                "discounted rate for stable remitter behavior",
            )
        } else {
            (
                self.policy.standard_rate_bps,
                "Corridor offer for borrowers with verified histories.",
                "standard rate for corridor",
            )
        };

        Ok(CreditDecision {
            approved: true,
            max_amount: amount,
            interest_rate_bps: rate,
            reason: reason.to_string(),
            analysis: json!({
                "strategy": DecisionStrategy::AttributeAware.as_str(),
                "branch": if stable { "stable_remitter" } else { "standard" },
                "credit_score": credit_score,
                "requested_amount": requested.to_string(),
                "verification": verification,
                "zk_attributes": attributes.to_json(),
                "repayment_plan": self.plan(amount),
                "corridor": DEFAULT_CORRIDOR,
                "notes": notes,
            }),
            repayment_months: self.policy.repayment_months,
            strategy: DecisionStrategy::AttributeAware,
        })
    }

    /// The conservative decision. Pure, infallible.
    pub fn fallback(&self) -> CreditDecision {
        let amount = self.policy.base_amount;
        let rate = self.policy.standard_rate_bps;
        CreditDecision {
            approved: true,
            max_amount: amount,
            interest_rate_bps: rate,
            reason: format!(
                "Fallback decision: {amount} over {} months at {}% APR.",
                self.policy.repayment_months,
                percent(rate)
            ),
            analysis: json!({
                "strategy": DecisionStrategy::Fallback.as_str(),
                "repayment_plan": self.plan(amount),
            }),
            repayment_months: self.policy.repayment_months,
            strategy: DecisionStrategy::Fallback,
        }
    }

    fn plan(&self, amount: Amount) -> serde_json::Value {
        json!({
            "months": self.policy.repayment_months,
            "installment": amount.split(self.policy.repayment_months).to_string(),
        })
    }
}

fn check_requested(requested: Amount) -> Result<(), DecisionError> {
    if requested.is_zero() {
        return Err(DecisionError::InvalidRequest(
            "requested amount must be positive".into(),
        ));
    }
    Ok(())
}

fn percent(bps: u32) -> String {
    let whole = bps / 100;
    match bps % 100 {
        0 => whole.to_string(),
        frac => format!("{whole}.{frac:02}"),
    }
}
