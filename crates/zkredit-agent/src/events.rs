//! Structured domain events.
//!
//! Every settled remittance, loan decision, disbursement, and payment is
//! published on an [`EventBus`]. Subscribers receive events in publish
//! order; a subscriber that falls more than the channel capacity behind
//! observes `RecvError::Lagged` and skips ahead.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use zkredit_core::types::{LoanDisbursementEvent, PaymentResult, RemittanceEvent};
use zkredit_credit::CreditDecision;

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    RemittanceRecorded(RemittanceEvent),
    LoanDisbursed(LoanDisbursementEvent),
    LoanDecided {
        worker_id: String,
        decision: CreditDecision,
    },
    PaymentExecuted {
        worker_id: String,
        payment: PaymentResult,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemittanceRecorded(_) => "remittance_recorded",
            Self::LoanDisbursed(_) => "loan_disbursed",
            Self::LoanDecided { .. } => "loan_decided",
            Self::PaymentExecuted { .. } => "payment_executed",
        }
    }
}

/// Fan-out channel for [`LedgerEvent`]s. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LedgerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: LedgerEvent) {
        let name = event.name();
        match self.tx.send(event) {
            Ok(receivers) => trace!(event = name, receivers, "event published"),
            Err(_) => trace!(event = name, "event dropped, no subscribers"),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkredit_credit::{CreditDecisionEngine, DecisionStrategy};

    fn decided(worker: &str) -> LedgerEvent {
        LedgerEvent::LoanDecided {
            worker_id: worker.into(),
            decision: CreditDecisionEngine::new(DecisionStrategy::Fallback).fallback(),
        }
    }

    #[tokio::test]
    async fn subscribers_see_events_in_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        bus.emit(decided("a"));
        bus.emit(decided("b"));
        assert_eq!(rx.recv().await.unwrap(), decided("a"));
        assert_eq!(rx.recv().await.unwrap(), decided("b"));
    }

    #[test]
    fn emit_without_subscribers_is_fine() {
        let bus = EventBus::new(4);
        assert_eq!(bus.subscriber_count(), 0);
        bus.emit(decided("a"));
    }

    #[tokio::test]
    async fn clones_share_the_channel() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        bus.clone().emit(decided("a"));
        assert_eq!(rx.recv().await.unwrap().name(), "loan_decided");
    }

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_value(decided("w")).unwrap();
        assert_eq!(json["event"], "loan_decided");
        assert_eq!(json["worker_id"], "w");
        assert_eq!(json["decision"]["strategy"], "fallback");
    }
}
