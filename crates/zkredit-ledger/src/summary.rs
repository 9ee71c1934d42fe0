//! Trailing-window summaries of a worker's remittance history.
//!
//! Pure computation over a slice of events and a caller-supplied "now".
//! Months are fixed 30-day periods ([`MONTH_MS`]) for the window cutoff and
//! account age, while activity is counted per UTC calendar month.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Datelike};

use zkredit_core::amount::Amount;
use zkredit_core::attributes::{WindowSummary, ZkAttributes};
use zkredit_core::constants::MONTH_MS;
use zkredit_core::error::StoreError;
use zkredit_core::traits::EventStore;
use zkredit_core::types::RemittanceEvent;

use crate::attributes::derive_attributes;

/// Summarize `history` over the trailing `window_months` ending at `now_ms`.
///
/// - In-window events are those with `timestamp_ms >= now - window × 30 days`.
/// - `months_with_activity` counts distinct UTC `(year, month)` pairs among them.
/// - `total_volume` sums their **gross** amounts.
/// - `account_age_months` uses the oldest event of the entire history:
///   `floor((now − oldest) / 30 days)`, at least 1 when any event exists.
///
/// History order is irrelevant; no field assumes events are sorted.
///
/// # Examples
///
/// ```
/// use zkredit_ledger::summarize;
///
/// let summary = summarize(&[], 6, 1_700_000_000_000);
/// assert_eq!(summary.months_with_activity, 0);
/// assert_eq!(summary.account_age_months, 0);
/// ```
pub fn summarize(history: &[RemittanceEvent], window_months: u32, now_ms: i64) -> WindowSummary {
    let Some(oldest_ms) = history.iter().map(|e| e.timestamp_ms).min() else {
        return WindowSummary::default();
    };

    let cutoff = now_ms.saturating_sub(MONTH_MS.saturating_mul(window_months as i64));

    let mut months = BTreeSet::new();
    let mut total_volume = Amount::ZERO;
    let mut total_transactions: u32 = 0;
    for event in history.iter().filter(|e| e.timestamp_ms >= cutoff) {
        if let Some(at) = DateTime::from_timestamp_millis(event.timestamp_ms) {
            months.insert((at.year(), at.month()));
        }
        total_volume = total_volume.saturating_add(event.gross_amount);
        total_transactions = total_transactions.saturating_add(1);
    }

    let elapsed_months = now_ms.saturating_sub(oldest_ms).max(0) / MONTH_MS;
    let account_age_months = u32::try_from(elapsed_months).unwrap_or(u32::MAX).max(1);

    WindowSummary {
        months_with_activity: u32::try_from(months.len()).unwrap_or(u32::MAX),
        total_volume,
        account_age_months,
        total_transactions,
    }
}

/// Summarizes workers' histories straight out of an [`EventStore`].
#[derive(Clone)]
pub struct WindowedSummarizer {
    store: Arc<dyn EventStore>,
}

impl WindowedSummarizer {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Summary of `worker_id`'s remittances over the trailing window.
    pub fn summarize(
        &self,
        worker_id: &str,
        window_months: u32,
        now_ms: i64,
    ) -> Result<WindowSummary, StoreError> {
        let history = self.store.remittances_for_worker(worker_id)?;
        Ok(summarize(&history, window_months, now_ms))
    }

    /// Banded attributes of `worker_id`'s trailing window.
    pub fn attributes(
        &self,
        worker_id: &str,
        window_months: u32,
        now_ms: i64,
    ) -> Result<ZkAttributes, StoreError> {
        self.summarize(worker_id, window_months, now_ms)
            .map(|summary| derive_attributes(&summary))
    }
}
