//! Attribute derivation: bucket a [`WindowSummary`] into [`ZkAttributes`].
//!
//! Pure function of the summary. Band lower bounds are inclusive.
//!
//! | Volume (gross) | Band      |   | Account age | Band    |
//! |----------------|-----------|---|-------------|---------|
//! | < 300          | `0-300`   |   | < 3 months  | `0-3m`  |
//! | 300 – < 600    | `300-600` |   | 3 – < 6     | `3-6m`  |
//! | 600 – < 900    | `600-900` |   | 6 – < 12    | `6-12m` |
//! | ≥ 900          | `900+`    |   | ≥ 12        | `12m+`  |

use zkredit_core::amount::Amount;
use zkredit_core::attributes::{AgeBand, VolumeBand, WindowSummary, ZkAttributes};
use zkredit_core::constants::STABLE_REMITTER_MIN_MONTHS;

const VOLUME_300: Amount = Amount::from_whole(300);
const VOLUME_600: Amount = Amount::from_whole(600);
const VOLUME_900: Amount = Amount::from_whole(900);

/// Volume band for a total remitted amount.
pub fn volume_band(total: Amount) -> VolumeBand {
    if total >= VOLUME_900 {
        VolumeBand::Over900
    } else if total >= VOLUME_600 {
        VolumeBand::From600To900
    } else if total >= VOLUME_300 {
        VolumeBand::From300To600
    } else {
        VolumeBand::UpTo300
    }
}

/// Age band for an account age in months.
pub fn age_band(months: u32) -> AgeBand {
    match months {
        12.. => AgeBand::OverTwelveMonths,
        6..=11 => AgeBand::SixToTwelveMonths,
        3..=5 => AgeBand::ThreeToSixMonths,
        _ => AgeBand::UnderThreeMonths,
    }
}

/// Derive the privacy-preserving attributes of a summary.
///
/// # Examples
///
/// ```
/// use zkredit_core::attributes::{AgeBand, VolumeBand, WindowSummary};
/// use zkredit_ledger::derive_attributes;
///
/// let attrs = derive_attributes(&WindowSummary::default());
/// assert!(!attrs.stable_remitter);
/// assert_eq!(attrs.total_remitted_band, VolumeBand::UpTo300);
/// assert_eq!(attrs.account_age_band, AgeBand::UnderThreeMonths);
/// ```
pub fn derive_attributes(summary: &WindowSummary) -> ZkAttributes {
    ZkAttributes {
        stable_remitter: summary.months_with_activity >= STABLE_REMITTER_MIN_MONTHS,
        total_remitted_band: volume_band(summary.total_volume),
        account_age_band: age_band(summary.account_age_months),
        months_with_activity: summary.months_with_activity,
        total_transactions: summary.total_transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn volume_band_boundaries() {
        assert_eq!(volume_band(Amount::ZERO), VolumeBand::UpTo300);
        assert_eq!(volume_band(amount("299.99")), VolumeBand::UpTo300);
        assert_eq!(volume_band(amount("300")), VolumeBand::From300To600);
        assert_eq!(volume_band(amount("599.99999999")), VolumeBand::From300To600);
        assert_eq!(volume_band(amount("600")), VolumeBand::From600To900);
        assert_eq!(volume_band(amount("899.99")), VolumeBand::From600To900);
        assert_eq!(volume_band(amount("900")), VolumeBand::Over900);
        assert_eq!(volume_band(amount("1002.88")), VolumeBand::Over900);
    }

    #[test]
    fn age_band_boundaries() {
        assert_eq!(age_band(0), AgeBand::UnderThreeMonths);
        assert_eq!(age_band(2), AgeBand::UnderThreeMonths);
        assert_eq!(age_band(3), AgeBand::ThreeToSixMonths);
        assert_eq!(age_band(5), AgeBand::ThreeToSixMonths);
        assert_eq!(age_band(6), AgeBand::SixToTwelveMonths);
        assert_eq!(age_band(11), AgeBand::SixToTwelveMonths);
        assert_eq!(age_band(12), AgeBand::OverTwelveMonths);
        assert_eq!(age_band(u32::MAX), AgeBand::OverTwelveMonths);
    }

    #[test]
    fn raw_counts_pass_through() {
        let summary = WindowSummary {
            months_with_activity: 2,
            total_volume: amount("450"),
            account_age_months: 7,
            total_transactions: 9,
        };
        let attrs = derive_attributes(&summary);
        assert_eq!(attrs.months_with_activity, 2);
        assert_eq!(attrs.total_transactions, 9);
        assert!(!attrs.stable_remitter);
        assert_eq!(attrs.total_remitted_band, VolumeBand::From300To600);
        assert_eq!(attrs.account_age_band, AgeBand::SixToTwelveMonths);
    }

    proptest! {
        #[test]
        fn stable_iff_three_months(months in 0u32..=24) {
            let summary = WindowSummary { months_with_activity: months, ..WindowSummary::default() };
            prop_assert_eq!(derive_attributes(&summary).stable_remitter, months >= 3);
        }

        #[test]
        fn volume_band_monotonic(a in 0u64..=2_000 * 100_000_000, b in 0u64..=2_000 * 100_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(volume_band(Amount::from_units(lo)) <= volume_band(Amount::from_units(hi)));
        }
    }
}
