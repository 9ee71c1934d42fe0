//! In-memory event store.
//!
//! The process-local default [`EventStore`]. All appends go through a single
//! `RwLock` write guard, so concurrent orchestrators never lose updates.
//! Reads clone the matching events under a read guard and hand back a
//! snapshot; a later append cannot change what a reader already holds.

use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::debug;

use zkredit_core::error::StoreError;
use zkredit_core::traits::EventStore;
use zkredit_core::types::{EventId, LoanDisbursementEvent, RemittanceEvent};

#[derive(Debug, Default)]
struct Inner {
    remittances: Vec<RemittanceEvent>,
    loans: Vec<LoanDisbursementEvent>,
    /// Ids of every event in the store, across both collections.
    ids: HashSet<EventId>,
}

/// Append-only, process-lifetime event ledger.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: RwLock<Inner>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events of both kinds.
    pub fn len(&self) -> usize {
        let inner = self.inner.read();
        inner.remittances.len() + inner.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventStore for InMemoryEventStore {
    fn record_remittance(&self, event: RemittanceEvent) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.ids.insert(event.event_id.clone()) {
            return Err(StoreError::DuplicateEvent(event.event_id.to_string()));
        }
        debug!(
            event_id = %event.event_id,
            worker = %event.worker_id,
            topic = %event.ledger_topic,
            gross = %event.gross_amount,
            "remittance recorded"
        );
        inner.remittances.push(event);
        Ok(())
    }

    fn record_loan_disbursement(&self, event: LoanDisbursementEvent) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.ids.insert(event.event_id.clone()) {
            return Err(StoreError::DuplicateEvent(event.event_id.to_string()));
        }
        debug!(
            event_id = %event.event_id,
            worker = %event.worker_id,
            amount = %event.amount,
            "loan disbursement recorded"
        );
        inner.loans.push(event);
        Ok(())
    }

    fn remittances_for_worker(&self, worker_id: &str) -> Result<Vec<RemittanceEvent>, StoreError> {
        let mut events: Vec<RemittanceEvent> = {
            let inner = self.inner.read();
            inner
                .remittances
                .iter()
                .filter(|e| e.worker_id == worker_id)
                .cloned()
                .collect()
        };
        // Timestamps are caller-supplied; append order says nothing about time.
        events.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        Ok(events)
    }

    fn loan_disbursements(&self) -> Result<Vec<LoanDisbursementEvent>, StoreError> {
        Ok(self.inner.read().loans.clone())
    }
}
