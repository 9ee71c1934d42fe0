//! Credit score derivation.
//!
//! Integer score in `0–1000`:
//!
//! | Component              | Points |
//! |------------------------|--------|
//! | Baseline               | 300    |
//! | Each verified proof    | 200    |
//! | Stable remitter        | 100    |

use zkredit_core::attributes::ZkAttributes;

use crate::decision::VerificationReport;

pub const MAX_CREDIT_SCORE: u16 = 1_000;
pub const BASELINE_SCORE: u16 = 300;
pub const VERIFIED_PROOF_POINTS: u16 = 200;
pub const STABLE_REMITTER_POINTS: u16 = 100;

/// Score a worker from verification results and (optional) attributes.
///
/// # Examples
///
/// ```
/// use zkredit_core::types::ProofKind;
/// use zkredit_credit::{credit_score, VerificationReport};
///
/// let report = VerificationReport::all_verified(&[ProofKind::Income, ProofKind::Collateral]);
/// assert_eq!(credit_score(&report, None), 700);
/// assert_eq!(credit_score(&VerificationReport::default(), None), 300);
/// ```
pub fn credit_score(report: &VerificationReport, attributes: Option<&ZkAttributes>) -> u16 {
    let verified = u16::try_from(report.verified_count()).unwrap_or(u16::MAX);
    let stable = attributes.is_some_and(|a| a.stable_remitter);
    BASELINE_SCORE
        .saturating_add(verified.saturating_mul(VERIFIED_PROOF_POINTS))
        .saturating_add(if stable { STABLE_REMITTER_POINTS } else { 0 })
        .min(MAX_CREDIT_SCORE)
}
