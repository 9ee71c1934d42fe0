//! Lender-side orchestration: deciding and paying out loans.

use std::time::Duration;

use tracing::{info, instrument};

use zkredit_core::address::{AccountId, EvmAddress};
use zkredit_core::amount::Amount;
use zkredit_core::types::{LoanDisbursementEvent, NewLoanDisbursement};
use zkredit_credit::{assess, CreditDecision, CreditDecisionEngine, LoanApplication};
use zkredit_payment::{PaymentConfig, PaymentRouter, TransferMode};

use crate::error::AgentError;
use crate::events::LedgerEvent;
use crate::services::Services;

/// Decides loan applications and disburses approved loans from a funding
/// account by direct transfer.
pub struct LoanDesk {
    engine: CreditDecisionEngine,
    pool: AccountId,
    router: PaymentRouter,
    verify_timeout: Duration,
    services: Services,
}

impl LoanDesk {
    pub fn new(
        engine: CreditDecisionEngine,
        pool: AccountId,
        payment: PaymentConfig,
        verify_timeout: Duration,
        services: Services,
    ) -> Self {
        Self {
            engine,
            pool,
            router: PaymentRouter::new(services.ledger.clone(), payment),
            verify_timeout,
            services,
        }
    }

    pub fn engine(&self) -> &CreditDecisionEngine {
        &self.engine
    }

    pub fn pool(&self) -> AccountId {
        self.pool
    }

    /// Verify the application's proofs and decide it. Never fails.
    #[instrument(skip(self, application), fields(worker = %application.worker_id))]
    pub async fn review(&self, application: &LoanApplication) -> CreditDecision {
        let decision = assess(
            &self.engine,
            application,
            self.services.verifier.as_ref(),
            self.verify_timeout,
        )
        .await;
        self.services.bus.emit(LedgerEvent::LoanDecided {
            worker_id: application.worker_id.clone(),
            decision: decision.clone(),
        });
        decision
    }

    /// Pay an approved loan to `receiver` and record the disbursement.
    ///
    /// Pays the smaller of the requested and approved amounts. A denied
    /// decision fails with [`AgentError::NotApproved`] and moves nothing.
    #[instrument(skip_all, fields(worker = %application.worker_id, receiver = %receiver))]
    pub async fn disburse(
        &self,
        application: &LoanApplication,
        decision: &CreditDecision,
        receiver: &EvmAddress,
    ) -> Result<LoanDisbursementEvent, AgentError> {
        if !decision.approved {
            return Err(AgentError::NotApproved(decision.reason.clone()));
        }
        let amount: Amount = application.requested_amount.min(decision.max_amount);

        let payment = self
            .router
            .execute(&TransferMode::DirectTransfer, &self.pool, receiver, amount.units())
            .await?;

        let event = LoanDisbursementEvent::finalize(NewLoanDisbursement {
            worker_id: application.worker_id.clone(),
            decision_agent_id: decision.strategy.agent_id().to_string(),
            amount,
            interest_rate_bps: decision.interest_rate_bps,
            tenure_months: decision.repayment_months,
            funding_source: self.pool.to_string(),
            transaction_hash: payment.transaction_hash.clone(),
            timestamp_ms: self.services.clock.now_ms(),
            corridor: application.corridor.clone(),
            notes: Some(decision.reason.clone()),
        });
        self.services.store.record_loan_disbursement(event.clone())?;

        self.services.bus.emit(LedgerEvent::PaymentExecuted {
            worker_id: application.worker_id.clone(),
            payment,
        });
        self.services.bus.emit(LedgerEvent::LoanDisbursed(event.clone()));

        info!(
            event_id = %event.event_id,
            amount = %event.amount,
            rate_bps = event.interest_rate_bps,
            agent = %event.decision_agent_id,
            "loan disbursed"
        );
        Ok(event)
    }
}
