//! Many workers remitting through one shared store at once.

use std::sync::Arc;

use zkredit_agent::RemittanceRequest;
use zkredit_core::amount::Amount;
use zkredit_tests::helpers::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_workers_lose_no_appends() {
    let h = Harness::new(ms(2025, 3, 15));
    let workers: Vec<_> = (0..8).map(|i| Arc::new(h.worker(&format!("w{i}")))).collect();

    let mut handles = Vec::new();
    for worker in &workers {
        for _ in 0..10 {
            let worker = Arc::clone(worker);
            handles.push(tokio::spawn(async move {
                worker
                    .send_remittance(RemittanceRequest::new(Amount::from_whole(100)))
                    .await
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(h.ledger.settlements().len(), 80);
    for worker in &workers {
        let history = h
            .services
            .store
            .remittances_for_worker(worker.worker_id())
            .unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(worker.profile().transaction_count(), 10);

        let summary = worker.remittance_summary().unwrap();
        assert_eq!(summary.total_transactions, 10);
        assert_eq!(summary.total_volume, Amount::from_whole(1_000));
    }
}

#[tokio::test]
async fn out_of_order_timestamps_summarize_the_same() {
    let h = Harness::new(ms(2025, 1, 1));
    let worker = h.worker("W");
    // Recorded newest first.
    for (m, d) in [(6, 1), (3, 1), (5, 1), (4, 1)] {
        h.clock.set(ms(2025, m, d));
        worker
            .send_remittance(RemittanceRequest::new(Amount::from_whole(50)))
            .await
            .unwrap();
    }
    h.clock.set(ms(2025, 6, 15));

    let summary = worker.remittance_summary().unwrap();
    assert_eq!(summary.months_with_activity, 4);
    // Oldest event is March 1, 106 days before June 15.
    assert_eq!(summary.account_age_months, 3);

    let history = h.services.store.remittances_for_worker("W").unwrap();
    let stamps: Vec<_> = history.iter().map(|e| e.timestamp_ms).collect();
    let mut sorted = stamps.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(stamps, sorted);
}
