//! Handles to the collaborators an agent works through.

use std::sync::Arc;

use zkredit_core::traits::{
    Clock, EventStore, LedgerClient, ProofProvider, ProofVerifier, SystemClock,
};
use zkredit_ledger::InMemoryEventStore;

use crate::events::EventBus;

/// Shared collaborators. Cloning shares every handle.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn EventStore>,
    pub ledger: Arc<dyn LedgerClient>,
    pub prover: Arc<dyn ProofProvider>,
    pub verifier: Arc<dyn ProofVerifier>,
    pub clock: Arc<dyn Clock>,
    pub bus: EventBus,
}

impl Services {
    /// In-memory store, wall clock, and a fresh event bus around the given
    /// external clients.
    pub fn in_memory(
        ledger: Arc<dyn LedgerClient>,
        prover: Arc<dyn ProofProvider>,
        verifier: Arc<dyn ProofVerifier>,
    ) -> Self {
        Self {
            store: Arc::new(InMemoryEventStore::new()),
            ledger,
            prover,
            verifier,
            clock: Arc::new(SystemClock),
            bus: EventBus::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn EventStore>) -> Self {
        self.store = store;
        self
    }
}
