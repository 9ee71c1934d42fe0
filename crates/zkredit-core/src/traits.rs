//! Trait interfaces for ZKredit.
//!
//! These traits define the seams between crates and external collaborators:
//! - [`EventStore`]: append-only remittance/loan ledger (zkredit-ledger implements)
//! - [`LedgerClient`]: settlement network client (external)
//! - [`ProofProvider`] / [`ProofVerifier`]: zero-knowledge proving service (external)
//! - [`Clock`]: wall-clock source for event timestamps

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use crate::address::AccountId;
use crate::error::{PaymentError, ProofError, StoreError};
use crate::types::{
    ContractCall, LoanDisbursementEvent, ProofArtifact, ProofRequest, RemittanceEvent,
    SettlementReceipt,
};

/// Append-only store of remittance and loan-disbursement events.
///
/// Appends must be serialized per store; reads return snapshots that a
/// concurrent append cannot disturb.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait EventStore: Send + Sync {
    /// Append a remittance. Fails if the event id is already present.
    fn record_remittance(&self, event: RemittanceEvent) -> Result<(), StoreError>;

    /// Append a loan disbursement. Fails if the event id is already present.
    fn record_loan_disbursement(&self, event: LoanDisbursementEvent) -> Result<(), StoreError>;

    /// All remittances sent by `worker_id`, most recent first.
    fn remittances_for_worker(&self, worker_id: &str) -> Result<Vec<RemittanceEvent>, StoreError>;

    /// All loan disbursements, in insertion order.
    fn loan_disbursements(&self) -> Result<Vec<LoanDisbursementEvent>, StoreError>;

    /// Loan disbursements paid to `worker_id`, most recent first.
    ///
    /// Default implementation filters [`loan_disbursements`](Self::loan_disbursements).
    fn loan_disbursements_for_worker(
        &self,
        worker_id: &str,
    ) -> Result<Vec<LoanDisbursementEvent>, StoreError> {
        let mut events: Vec<_> = self
            .loan_disbursements()?
            .into_iter()
            .filter(|e| e.worker_id == worker_id)
            .collect();
        events.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        Ok(events)
    }
}

/// Narrow settlement capability of the external ledger client.
///
/// Key management, signing, and network submission stay behind this trait.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Move `amount` smallest units from `from` to `to`.
    async fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<SettlementReceipt, PaymentError>;

    /// Invoke a payable contract function.
    async fn call_contract(&self, call: &ContractCall) -> Result<SettlementReceipt, PaymentError>;
}

/// External zero-knowledge proving service.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProofProvider: Send + Sync {
    /// Produce an opaque proof for the given public inputs.
    async fn prove(&self, request: &ProofRequest) -> Result<ProofArtifact, ProofError>;
}

/// Companion verifier for [`ProofProvider`] artifacts.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    /// Whether the artifact verifies against its own public inputs.
    async fn verify(&self, artifact: &ProofArtifact) -> Result<bool, ProofError>;
}

/// Source of event timestamps.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Used by tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::types::{EventId, NewLoanDisbursement, ReceiptStatus};

    fn disbursement(worker: &str, ts: i64) -> LoanDisbursementEvent {
        LoanDisbursementEvent::finalize(NewLoanDisbursement {
            worker_id: worker.into(),
            decision_agent_id: "credit-2".into(),
            amount: Amount::from_whole(150),
            interest_rate_bps: 1_000,
            tenure_months: 4,
            funding_source: "0.0.5005".into(),
            transaction_hash: "0x01".into(),
            timestamp_ms: ts,
            corridor: "middle-east-to-philippines".into(),
            notes: None,
        })
    }

    // ------------------------------------------------------------------
    // EventStore default methods
    // ------------------------------------------------------------------

    struct FixedStore {
        loans: Result<Vec<LoanDisbursementEvent>, StoreError>,
    }

    impl EventStore for FixedStore {
        fn record_remittance(&self, _event: RemittanceEvent) -> Result<(), StoreError> {
            Ok(())
        }

        fn record_loan_disbursement(&self, _event: LoanDisbursementEvent) -> Result<(), StoreError> {
            Ok(())
        }

        fn remittances_for_worker(&self, _worker_id: &str) -> Result<Vec<RemittanceEvent>, StoreError> {
            Ok(Vec::new())
        }

        fn loan_disbursements(&self) -> Result<Vec<LoanDisbursementEvent>, StoreError> {
            self.loans.clone()
        }
    }

    #[test]
    fn disbursements_for_worker_filters_and_sorts() {
        let store = FixedStore {
            loans: Ok(vec![
                disbursement("a", 10),
                disbursement("b", 20),
                disbursement("a", 30),
            ]),
        };

        let events = store.loan_disbursements_for_worker("a").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp_ms, 30);
        assert_eq!(events[1].timestamp_ms, 10);
    }

    #[test]
    fn disbursements_for_worker_propagates_errors() {
        let store = FixedStore {
            loans: Err(StoreError::Backend("offline".into())),
        };
        assert_eq!(
            store.loan_disbursements_for_worker("a"),
            Err(StoreError::Backend("offline".into()))
        );
    }

    // ------------------------------------------------------------------
    // Async collaborator mocks
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn ledger_client_mock_transfer() {
        let mut client = MockLedgerClient::new();
        client.expect_transfer().returning(|_, _, amount| {
            Ok(SettlementReceipt {
                transaction_id: format!("0.0.2@{amount}"),
                transaction_hash: "0xfeed".into(),
                status: ReceiptStatus::Success,
            })
        });

        let receipt = client
            .transfer(&AccountId::new(0, 0, 2), &AccountId::new(0, 0, 3), 500)
            .await
            .unwrap();
        assert_eq!(receipt.transaction_id, "0.0.2@500");
        assert!(receipt.status.is_success());
    }

    // ------------------------------------------------------------------
    // Clocks
    // ------------------------------------------------------------------

    #[test]
    fn manual_clock_moves_on_request() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn system_clock_is_after_2024() {
        assert!(SystemClock.now_ms() > 1_704_067_200_000);
    }

    #[test]
    fn event_id_from_string_roundtrip() {
        let id = EventId::from_string("remit_0011223344556677");
        assert_eq!(id.to_string(), "remit_0011223344556677");
    }
}
