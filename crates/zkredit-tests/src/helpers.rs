//! Shared test helpers: deterministic ledger and proof collaborators.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use zkredit_agent::{AgentConfig, Services, WorkerAgent, WorkerProfile};
use zkredit_core::address::AccountId;
use zkredit_core::error::{PaymentError, ProofError};
use zkredit_core::traits::{LedgerClient, ManualClock, ProofProvider, ProofVerifier};
use zkredit_core::types::{
    ContractCall, ProofArtifact, ProofKind, ProofRequest, ReceiptStatus, SettlementReceipt,
};

/// Milliseconds since the epoch of `y-m-d 12:00:00 UTC`.
pub fn ms(y: i32, m: u32, d: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0)
        .single()
        .map(|t| t.timestamp_millis())
        .unwrap_or_default()
}

/// One settlement the fake ledger accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: u64,
    },
    Contract(ContractCall),
}

/// In-memory ledger that settles everything unless told to reject.
#[derive(Default)]
pub struct FakeLedger {
    seq: AtomicU64,
    settled: Mutex<Vec<Settlement>>,
    reject_with: Mutex<Option<String>>,
}

impl FakeLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every later settlement fail with `status`.
    pub fn reject(&self, status: &str) {
        *self.reject_with.lock() = Some(status.to_string());
    }

    pub fn settlements(&self) -> Vec<Settlement> {
        self.settled.lock().clone()
    }

    fn settle(&self, settlement: Settlement) -> SettlementReceipt {
        let n = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let transaction_hash = format!("0x{}", hex::encode(Sha256::digest(n.to_be_bytes())));
        let status = match self.reject_with.lock().clone() {
            Some(code) => ReceiptStatus::Failed(code),
            None => {
                self.settled.lock().push(settlement);
                ReceiptStatus::Success
            }
        };
        SettlementReceipt {
            transaction_id: format!("0.0.2@{n}"),
            transaction_hash,
            status,
        }
    }
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<SettlementReceipt, PaymentError> {
        Ok(self.settle(Settlement::Transfer {
            from: *from,
            to: *to,
            amount,
        }))
    }

    async fn call_contract(&self, call: &ContractCall) -> Result<SettlementReceipt, PaymentError> {
        Ok(self.settle(Settlement::Contract(call.clone())))
    }
}

/// Prover whose artifact is the SHA-256 of the serialized public inputs.
#[derive(Default)]
pub struct HashProver {
    requests: Mutex<Vec<ProofRequest>>,
}

impl HashProver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requests(&self) -> Vec<ProofRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ProofProvider for HashProver {
    async fn prove(&self, request: &ProofRequest) -> Result<ProofArtifact, ProofError> {
        self.requests.lock().push(request.clone());
        let encoded = serde_json::to_vec(&request.public_inputs)
            .map_err(|e| ProofError::Provider(e.to_string()))?;
        Ok(ProofArtifact {
            kind: request.kind(),
            proof: Sha256::digest(&encoded).to_vec(),
            public_inputs: request.public_inputs.clone(),
        })
    }
}

/// Verifier that recomputes [`HashProver`]'s digest, optionally rejecting
/// whole proof kinds.
#[derive(Default)]
pub struct HashVerifier {
    rejected: Mutex<HashSet<ProofKind>>,
}

impl HashVerifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reject(&self, kind: ProofKind) {
        self.rejected.lock().insert(kind);
    }
}

#[async_trait]
impl ProofVerifier for HashVerifier {
    async fn verify(&self, artifact: &ProofArtifact) -> Result<bool, ProofError> {
        if self.rejected.lock().contains(&artifact.kind) {
            return Ok(false);
        }
        let encoded = serde_json::to_vec(&artifact.public_inputs)
            .map_err(|e| ProofError::Provider(e.to_string()))?;
        Ok(Sha256::digest(&encoded).as_slice() == artifact.proof.as_slice())
    }
}

/// Everything a scenario needs, wired together.
pub struct Harness {
    pub ledger: Arc<FakeLedger>,
    pub prover: Arc<HashProver>,
    pub verifier: Arc<HashVerifier>,
    pub clock: Arc<ManualClock>,
    pub services: Services,
    pub config: AgentConfig,
}

impl Harness {
    /// Harness with extra `ZKREDIT_*` variables (names without the prefix).
    pub fn with_env(start_ms: i64, vars: &[(&str, &str)]) -> Self {
        let ledger = FakeLedger::new();
        let prover = HashProver::new();
        let verifier = HashVerifier::new();
        let clock = Arc::new(ManualClock::new(start_ms));

        let mut env: Vec<(String, String)> = vec![
            ("ZKREDIT_WORKER_ADDRESS".into(), "0.0.1001".into()),
            ("ZKREDIT_RECEIVER_ADDRESS".into(), "0.0.7001".into()),
        ];
        env.extend(vars.iter().map(|(k, v)| (format!("ZKREDIT_{k}"), v.to_string())));
        let config = AgentConfig::from_lookup(|key| {
            env.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap_or_else(|e| panic!("test configuration rejected: {e}"));

        let services = Services::in_memory(ledger.clone(), prover.clone(), verifier.clone())
            .with_clock(clock.clone());

        Self {
            ledger,
            prover,
            verifier,
            clock,
            services,
            config,
        }
    }

    pub fn new(start_ms: i64) -> Self {
        Self::with_env(start_ms, &[])
    }

    pub fn worker(&self, worker_id: &str) -> WorkerAgent {
        WorkerAgent::new(
            worker_id,
            &self.config,
            WorkerProfile::default(),
            self.services.clone(),
        )
    }
}
