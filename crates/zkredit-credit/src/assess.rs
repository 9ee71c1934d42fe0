//! Loan application bundle and the verify-then-decide flow.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use zkredit_core::amount::Amount;
use zkredit_core::attributes::ZkAttributes;
use zkredit_core::error::ProofError;
use zkredit_core::traits::ProofVerifier;
use zkredit_core::types::{ProofArtifact, ProofKind};

use crate::decision::{CreditDecision, ProofCheck, VerificationReport};
use crate::engine::CreditDecisionEngine;
use crate::score::credit_score;

/// Proofs every application must carry.
pub const REQUIRED_PROOFS: [ProofKind; 3] =
    [ProofKind::Income, ProofKind::CreditHistory, ProofKind::Collateral];

/// Everything a lender sees about a worker's loan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub worker_id: String,
    pub requested_amount: Amount,
    pub proofs: Vec<ProofArtifact>,
    pub zk_attributes: ZkAttributes,
    pub corridor: String,
    pub created_at_ms: i64,
}

impl LoanApplication {
    pub fn proof(&self, kind: ProofKind) -> Option<&ProofArtifact> {
        self.proofs.iter().find(|p| p.kind == kind)
    }
}

/// Verify an application's proofs and decide it.
///
/// Each proof is verified with `timeout`. A proof that is missing, rejected,
/// errors, or times out is recorded as unverified, which routes the decision
/// to the fallback.
pub async fn assess(
    engine: &CreditDecisionEngine,
    application: &LoanApplication,
    verifier: &dyn ProofVerifier,
    timeout: Duration,
) -> CreditDecision {
    let mut checks = Vec::with_capacity(REQUIRED_PROOFS.len());
    for kind in REQUIRED_PROOFS {
        let verified = match application.proof(kind) {
            Some(artifact) => verify_one(verifier, artifact, timeout).await,
            None => {
                warn!(worker = %application.worker_id, %kind, "application is missing a proof");
                false
            }
        };
        checks.push(ProofCheck { kind, verified });
    }

    let report = VerificationReport::new(checks);
    let score = credit_score(&report, Some(&application.zk_attributes));
    let decision = engine.evaluate(
        score,
        application.requested_amount,
        &report,
        Some(&application.zk_attributes),
    );

    info!(
        worker = %application.worker_id,
        score,
        strategy = %decision.strategy,
        amount = %decision.max_amount,
        rate_bps = decision.interest_rate_bps,
        "loan assessed"
    );
    decision
}

async fn verify_one(verifier: &dyn ProofVerifier, artifact: &ProofArtifact, timeout: Duration) -> bool {
    let result = match tokio::time::timeout(timeout, verifier.verify(artifact)).await {
        Ok(result) => result,
        Err(_) => Err(ProofError::Timeout {
            kind: artifact.kind,
            after_ms: timeout.as_millis() as u64,
        }),
    };
    match result {
        Ok(verified) => verified,
        Err(e) => {
            warn!(kind = %artifact.kind, error = %e, "proof verification failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use zkredit_core::attributes::{AgeBand, VolumeBand};
    use zkredit_core::traits::MockProofVerifier;
    use zkredit_core::types::PublicInputs;

    use crate::policy::DecisionStrategy;

    fn artifact(kind: ProofKind) -> ProofArtifact {
        let public_inputs = match kind {
            ProofKind::Income => PublicInputs::Income {
                minimum_income: Amount::from_whole(500),
                timestamp_ms: 0,
            },
            ProofKind::CreditHistory => PublicInputs::CreditHistory {
                minimum_transactions: 1,
                time_range_months: 6,
                commitment: "00".repeat(32),
            },
            ProofKind::Collateral => PublicInputs::Collateral {
                minimum_value: Amount::from_whole(10_000),
                country_code: "PH".into(),
            },
        };
        ProofArtifact {
            kind,
            proof: vec![1, 2, 3],
            public_inputs,
        }
    }

    fn application(proofs: Vec<ProofArtifact>) -> LoanApplication {
        LoanApplication {
            worker_id: "worker-1".into(),
            requested_amount: Amount::from_whole(200),
            proofs,
            zk_attributes: ZkAttributes {
                stable_remitter: true,
                total_remitted_band: VolumeBand::Over900,
                account_age_band: AgeBand::ThreeToSixMonths,
                months_with_activity: 4,
                total_transactions: 4,
            },
            corridor: "middle-east-to-philippines".into(),
            created_at_ms: 0,
        }
    }

    fn full_application() -> LoanApplication {
        application(REQUIRED_PROOFS.iter().map(|&k| artifact(k)).collect())
    }

    #[tokio::test]
    async fn verified_application_uses_strategy() {
        let mut verifier = MockProofVerifier::new();
        verifier.expect_verify().times(3).returning(|_| Ok(true));

        let engine = CreditDecisionEngine::new(DecisionStrategy::AttributeAware);
        let d = assess(&engine, &full_application(), &verifier, Duration::from_secs(1)).await;
        assert_eq!(d.strategy, DecisionStrategy::AttributeAware);
        assert_eq!(d.interest_rate_bps, 900);
        assert_eq!(d.analysis["credit_score"], 1_000);
    }

    #[tokio::test]
    async fn rejected_proof_falls_back() {
        let mut verifier = MockProofVerifier::new();
        verifier
            .expect_verify()
            .returning(|a| Ok(a.kind != ProofKind::Collateral));

        let engine = CreditDecisionEngine::new(DecisionStrategy::AttributeAware);
        let d = assess(&engine, &full_application(), &verifier, Duration::from_secs(1)).await;
        assert_eq!(d.strategy, DecisionStrategy::Fallback);
    }

    #[tokio::test]
    async fn verifier_error_falls_back() {
        let mut verifier = MockProofVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(ProofError::Provider("circuit not loaded".into())));

        let engine = CreditDecisionEngine::new(DecisionStrategy::Base);
        let d = assess(&engine, &full_application(), &verifier, Duration::from_secs(1)).await;
        assert_eq!(d.strategy, DecisionStrategy::Fallback);
    }

    #[tokio::test]
    async fn missing_proof_falls_back_without_verifying_it() {
        let mut verifier = MockProofVerifier::new();
        verifier.expect_verify().times(2).returning(|_| Ok(true));

        let app = application(vec![artifact(ProofKind::Income), artifact(ProofKind::Collateral)]);
        let engine = CreditDecisionEngine::new(DecisionStrategy::AttributeAware);
        let d = assess(&engine, &app, &verifier, Duration::from_secs(1)).await;
        assert_eq!(d.strategy, DecisionStrategy::Fallback);
    }

    struct StalledVerifier;

    #[async_trait]
    impl ProofVerifier for StalledVerifier {
        async fn verify(&self, _artifact: &ProofArtifact) -> Result<bool, ProofError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn stalled_verifier_times_out_to_fallback() {
        let engine = CreditDecisionEngine::new(DecisionStrategy::AttributeAware);
        let d = assess(&engine, &full_application(), &StalledVerifier, Duration::from_millis(10)).await;
        assert_eq!(d.strategy, DecisionStrategy::Fallback);
        assert_eq!(d.max_amount, Amount::from_whole(150));
    }
}
