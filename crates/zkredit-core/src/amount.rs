//! Fixed-point monetary amounts.
//!
//! Every monetary value in ZKredit is an [`Amount`]: an unsigned count of
//! smallest settlement units, with [`UNIT`] smallest units per whole unit.
//! Fee, net, and banding arithmetic stay in integers; decimal forms exist
//! only for display and for input at the outer boundary.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BPS_PRECISION, UNIT};
use crate::error::ValidationError;

/// Number of fractional decimal digits representable by an [`Amount`].
pub const DECIMALS: usize = 8;

/// A monetary amount in smallest units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Construct from a count of smallest units.
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Construct from a whole number of currency units (saturating).
    pub const fn from_whole(whole: u64) -> Self {
        Self(whole.saturating_mul(UNIT))
    }

    /// Amount in smallest units.
    pub const fn units(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    pub fn saturating_add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }

    /// Apply a basis-point rate, rounding half up to the nearest smallest unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use zkredit_core::amount::Amount;
    ///
    /// // 0.7% of 250.72 = 1.75504
    /// let fee = "250.72".parse::<Amount>().unwrap().mul_bps(70);
    /// assert_eq!(fee.to_string(), "1.75504");
    /// ```
    pub fn mul_bps(self, bps: u64) -> Amount {
        let scaled = (self.0 as u128) * (bps as u128) + (BPS_PRECISION as u128 / 2);
        let units = scaled / BPS_PRECISION as u128;
        Amount(u64::try_from(units).unwrap_or(u64::MAX))
    }

    /// Divide into `parts` equal shares, rounding down.
    pub fn split(self, parts: u32) -> Amount {
        if parts == 0 {
            return Amount::ZERO;
        }
        Amount(self.0 / parts as u64)
    }

    /// Convert a decimal amount to smallest units, rounding half away from zero.
    ///
    /// Rejects non-finite input and results that are not strictly positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use zkredit_core::amount::Amount;
    ///
    /// assert_eq!(Amount::from_decimal(1.5).unwrap().units(), 150_000_000);
    /// assert_eq!(Amount::from_decimal(0.000000005).unwrap().units(), 1);
    /// assert!(Amount::from_decimal(0.0).is_err());
    /// assert!(Amount::from_decimal(f64::NAN).is_err());
    /// ```
    pub fn from_decimal(value: f64) -> Result<Amount, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        let scaled = (value * UNIT as f64).round();
        if scaled <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if scaled >= u64::MAX as f64 {
            return Err(ValidationError::AmountOverflow);
        }
        Ok(Amount(scaled as u64))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = format!("{:0width$}", self.0 % UNIT, width = DECIMALS);
        let trimmed = frac.trim_end_matches('0');
        if trimmed.len() < 2 {
            write!(f, "{whole}.{:0<2}", trimmed)
        } else {
            write!(f, "{whole}.{trimmed}")
        }
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    /// Parse a non-negative decimal string exactly (at most 8 fractional digits).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ValidationError::InvalidAmount(s.to_string());
        if s.is_empty() {
            return Err(invalid());
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
            || frac.len() > DECIMALS
        {
            return Err(invalid());
        }
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ValidationError::AmountOverflow)?
        };
        let frac_units: u64 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<width$}", width = DECIMALS)
                .parse()
                .map_err(|_| invalid())?
        };
        whole
            .checked_mul(UNIT)
            .and_then(|w| w.checked_add(frac_units))
            .map(Amount)
            .ok_or(ValidationError::AmountOverflow)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Amount::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_pads_two_decimals() {
        assert_eq!(Amount::from_whole(150).to_string(), "150.00");
        assert_eq!(Amount::from_units(50_000_000).to_string(), "0.50");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn display_keeps_significant_digits() {
        assert_eq!(Amount::from_units(175_504_000).to_string(), "1.75504");
        assert_eq!(Amount::from_units(1).to_string(), "0.00000001");
    }

    #[test]
    fn parse_exact() {
        assert_eq!("250.72".parse::<Amount>().unwrap().units(), 25_072_000_000);
        assert_eq!("300".parse::<Amount>().unwrap(), Amount::from_whole(300));
        assert_eq!(".5".parse::<Amount>().unwrap().units(), 50_000_000);
        assert_eq!("7.".parse::<Amount>().unwrap(), Amount::from_whole(7));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", ".", "-1", "1.2.3", "abc", "1.123456789", "1e5"] {
            assert!(bad.parse::<Amount>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn parse_overflow() {
        assert_eq!(
            "999999999999999999999".parse::<Amount>(),
            Err(ValidationError::AmountOverflow)
        );
    }

    #[test]
    fn from_decimal_rounds_half_away() {
        assert_eq!(Amount::from_decimal(0.000000025).unwrap().units(), 3);
        assert_eq!(Amount::from_decimal(248.96496).unwrap().units(), 24_896_496_000);
    }

    #[test]
    fn from_decimal_rejects_non_positive() {
        assert_eq!(Amount::from_decimal(-1.0), Err(ValidationError::NonPositiveAmount));
        assert_eq!(
            Amount::from_decimal(0.000000001),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(Amount::from_decimal(f64::INFINITY), Err(ValidationError::NonFiniteAmount));
    }

    #[test]
    fn mul_bps_rounds_half_up() {
        // 1 unit * 70 bps = 0.007 -> 700_000 smallest units exactly
        assert_eq!(Amount::from_whole(1).mul_bps(70).units(), 700_000);
        // 1 smallest unit * 5_000 bps = 0.5 -> rounds up to 1
        assert_eq!(Amount::from_units(1).mul_bps(5_000).units(), 1);
    }

    #[test]
    fn split_by_zero_is_zero() {
        assert_eq!(Amount::from_whole(10).split(0), Amount::ZERO);
        assert_eq!(Amount::from_whole(200).split(4), Amount::from_whole(50));
    }

    #[test]
    fn sum_saturates() {
        let total: Amount = [Amount::from_units(u64::MAX), Amount::from_units(1)]
            .into_iter()
            .sum();
        assert_eq!(total.units(), u64::MAX);
    }

    proptest! {
        #[test]
        fn display_parse_roundtrip(units in 0u64..=u64::MAX / 2) {
            let a = Amount::from_units(units);
            prop_assert_eq!(a.to_string().parse::<Amount>().unwrap(), a);
        }
    }
}
