//! Worker-side orchestration: remittances and loan applications.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use zkredit_core::address::{AccountId, EvmAddress};
use zkredit_core::amount::Amount;
use zkredit_core::attributes::{WindowSummary, ZkAttributes};
use zkredit_core::constants::{
    CREDIT_HISTORY_RANGE_MONTHS, DEFAULT_CORRIDOR, DEFAULT_CURRENCY, MIN_PROVEN_COLLATERAL,
    MIN_PROVEN_INCOME, MIN_PROVEN_TRANSACTIONS, ZK_INPUT_WINDOW_MONTHS,
};
use zkredit_core::error::{ProofError, ValidationError};
use zkredit_core::types::{
    NewRemittance, PaymentResult, ProofArtifact, ProofKind, ProofRequest, PublicInputs,
    RemittanceEvent,
};
use zkredit_credit::LoanApplication;
use zkredit_ledger::WindowedSummarizer;
use zkredit_payment::{compute_net, PaymentRouter};

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::events::LedgerEvent;
use crate::profile::{TransactionRecord, WorkerProfile};
use crate::services::Services;

/// A remittance the worker wants to send.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemittanceRequest {
    /// Native id or hex address. Defaults to the configured receiver.
    pub receiver: Option<String>,
    /// Gross amount, fee included.
    pub amount: Amount,
    /// Defaults to the worker's corridor.
    pub corridor: Option<String>,
    /// Defaults to `USD`.
    pub currency: Option<String>,
}

impl RemittanceRequest {
    pub fn new(amount: Amount) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    pub fn to(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn via(mut self, corridor: impl Into<String>) -> Self {
        self.corridor = Some(corridor.into());
        self
    }
}

/// What a settled remittance produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemittanceReceipt {
    pub event: RemittanceEvent,
    pub payment: PaymentResult,
    pub message: String,
}

/// Acts for one worker.
pub struct WorkerAgent {
    worker_id: String,
    account: AccountId,
    default_receiver: EvmAddress,
    default_corridor: String,
    remittance_cap: Amount,
    ledger_topic: String,
    proof_timeout: Duration,
    profile: Mutex<WorkerProfile>,
    router: PaymentRouter,
    summarizer: WindowedSummarizer,
    services: Services,
}

impl WorkerAgent {
    pub fn new(
        worker_id: impl Into<String>,
        config: &AgentConfig,
        profile: WorkerProfile,
        services: Services,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            account: config.worker_account,
            default_receiver: config.default_receiver,
            default_corridor: DEFAULT_CORRIDOR.to_string(),
            remittance_cap: config.remittance_cap,
            ledger_topic: config.ledger_topic.clone(),
            proof_timeout: config.proof_timeout,
            profile: Mutex::new(profile),
            router: PaymentRouter::new(services.ledger.clone(), config.payment.clone()),
            summarizer: WindowedSummarizer::new(services.store.clone()),
            services,
        }
    }

    /// Override the corridor used when a request names none.
    pub fn with_default_corridor(mut self, corridor: impl Into<String>) -> Self {
        self.default_corridor = corridor.into();
        self
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Snapshot of the private profile.
    pub fn profile(&self) -> WorkerProfile {
        self.profile.lock().clone()
    }

    pub fn add_transaction(&self, record: TransactionRecord) {
        let mut profile = self.profile.lock();
        profile.add_transaction(record);
        debug!(worker = %self.worker_id, total = profile.transaction_count(), "transaction added");
    }

    /// Pay a remittance and record it.
    ///
    /// Validation failures (zero, over the cap, fee consuming the whole
    /// amount, bad receiver) happen before any ledger call and leave the
    /// store untouched.
    #[instrument(skip(self, request), fields(worker = %self.worker_id, amount = %request.amount))]
    pub async fn send_remittance(
        &self,
        request: RemittanceRequest,
    ) -> Result<RemittanceReceipt, AgentError> {
        let gross = request.amount;
        if gross.is_zero() {
            return Err(ValidationError::NonPositiveAmount.into());
        }
        if gross > self.remittance_cap {
            return Err(ValidationError::AmountAboveCap {
                amount: gross,
                cap: self.remittance_cap,
            }
            .into());
        }

        let corridor = request
            .corridor
            .unwrap_or_else(|| self.default_corridor.clone());
        let currency = request
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let receiver = match request.receiver.as_deref() {
            Some(raw) => EvmAddress::parse(raw)?,
            None => self.default_receiver,
        };

        let breakdown = compute_net(gross)?;
        let mode = self.router.mode()?;
        let payment = self
            .router
            .execute(&mode, &self.account, &receiver, breakdown.net.units())
            .await?;

        let event = RemittanceEvent::finalize(
            NewRemittance {
                worker_id: self.worker_id.clone(),
                receiver_id: receiver.to_string(),
                corridor,
                gross_amount: breakdown.gross,
                fee: breakdown.fee,
                net_amount: breakdown.net,
                currency,
                transaction_hash: payment.transaction_hash.clone(),
                timestamp_ms: self.services.clock.now_ms(),
                ledger_topic: None,
            },
            &self.ledger_topic,
        );
        self.services.store.record_remittance(event.clone())?;

        self.add_transaction(TransactionRecord {
            hash: payment.transaction_hash.clone(),
            amount: breakdown.gross,
            timestamp_ms: event.timestamp_ms,
        });

        self.services.bus.emit(LedgerEvent::PaymentExecuted {
            worker_id: self.worker_id.clone(),
            payment: payment.clone(),
        });
        self.services
            .bus
            .emit(LedgerEvent::RemittanceRecorded(event.clone()));

        info!(
            event_id = %event.event_id,
            fee = %event.fee,
            net = %event.net_amount,
            corridor = %event.corridor,
            tx = %payment.transaction_id,
            "remittance settled"
        );

        let message = format!(
            "Remittance of {} {} sent to {}",
            event.net_amount, event.currency, event.receiver_id
        );
        Ok(RemittanceReceipt {
            event,
            payment,
            message,
        })
    }

    /// Assemble a loan application: three proofs plus banded attributes.
    ///
    /// Fails fast with [`AgentError::ProofInsufficient`] when a private
    /// metric is below its proof threshold. Emits nothing.
    #[instrument(skip(self), fields(worker = %self.worker_id))]
    pub async fn apply_for_loan(&self, amount: Amount) -> Result<LoanApplication, AgentError> {
        if amount.is_zero() {
            return Err(ValidationError::NonPositiveAmount.into());
        }

        let profile = self.profile();
        let now_ms = self.services.clock.now_ms();
        let requests = self.proof_requests(&profile, now_ms)?;

        let mut proofs = Vec::with_capacity(requests.len());
        for request in &requests {
            proofs.push(self.prove(request).await?);
        }

        let zk_attributes = self
            .summarizer
            .attributes(&self.worker_id, ZK_INPUT_WINDOW_MONTHS, now_ms)?;

        info!(
            requested = %amount,
            stable = zk_attributes.stable_remitter,
            band = %zk_attributes.total_remitted_band,
            "loan application assembled"
        );

        Ok(LoanApplication {
            worker_id: self.worker_id.clone(),
            requested_amount: amount,
            proofs,
            zk_attributes,
            corridor: self.default_corridor.clone(),
            created_at_ms: now_ms,
        })
    }

    /// Trailing-window summary of this worker's remittances.
    pub fn remittance_summary(&self) -> Result<WindowSummary, AgentError> {
        Ok(self.summarizer.summarize(
            &self.worker_id,
            ZK_INPUT_WINDOW_MONTHS,
            self.services.clock.now_ms(),
        )?)
    }

    /// Banded attributes of this worker's remittances.
    pub fn zk_attributes(&self) -> Result<ZkAttributes, AgentError> {
        Ok(self.summarizer.attributes(
            &self.worker_id,
            ZK_INPUT_WINDOW_MONTHS,
            self.services.clock.now_ms(),
        )?)
    }

    fn proof_requests(
        &self,
        profile: &WorkerProfile,
        now_ms: i64,
    ) -> Result<Vec<ProofRequest>, AgentError> {
        let min_income = Amount::from_whole(MIN_PROVEN_INCOME);
        if profile.monthly_income < min_income {
            return Err(insufficient(ProofKind::Income, profile.monthly_income, min_income));
        }

        let tx_count = profile.transaction_count();
        if tx_count < MIN_PROVEN_TRANSACTIONS as usize {
            return Err(insufficient(ProofKind::CreditHistory, tx_count, MIN_PROVEN_TRANSACTIONS));
        }

        let min_collateral = Amount::from_whole(MIN_PROVEN_COLLATERAL);
        if profile.collateral_value < min_collateral {
            return Err(insufficient(
                ProofKind::Collateral,
                profile.collateral_value,
                min_collateral,
            ));
        }

        let request = |public_inputs| ProofRequest {
            worker_id: self.worker_id.clone(),
            public_inputs,
        };
        Ok(vec![
            request(PublicInputs::Income {
                minimum_income: min_income,
                timestamp_ms: now_ms,
            }),
            request(PublicInputs::CreditHistory {
                minimum_transactions: MIN_PROVEN_TRANSACTIONS,
                time_range_months: CREDIT_HISTORY_RANGE_MONTHS,
                commitment: profile.history_commitment(),
            }),
            request(PublicInputs::Collateral {
                minimum_value: min_collateral,
                country_code: profile.country_code.clone(),
            }),
        ])
    }

    async fn prove(&self, request: &ProofRequest) -> Result<ProofArtifact, AgentError> {
        let kind = request.kind();
        match tokio::time::timeout(self.proof_timeout, self.services.prover.prove(request)).await {
            Ok(result) => {
                let artifact = result?;
                debug!(%kind, bytes = artifact.proof.len(), "proof generated");
                Ok(artifact)
            }
            Err(_) => Err(ProofError::Timeout {
                kind,
                after_ms: self.proof_timeout.as_millis() as u64,
            }
            .into()),
        }
    }
}

fn insufficient(kind: ProofKind, actual: impl ToString, required: impl ToString) -> AgentError {
    AgentError::ProofInsufficient {
        kind,
        actual: actual.to_string(),
        required: required.to_string(),
    }
}
