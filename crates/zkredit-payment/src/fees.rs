//! Remittance fee arithmetic.
//!
//! `fee = max(gross × 0.7%, 0.50)`, rounded half up to the smallest unit.
//! `net = gross − fee` must be strictly positive before anything is paid.

use serde::{Deserialize, Serialize};

use zkredit_core::amount::Amount;
use zkredit_core::constants::{MIN_REMITTANCE_FEE, REMITTANCE_FEE_BPS};
use zkredit_core::error::ValidationError;

/// Gross amount split into fee and the net amount delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub gross: Amount,
    pub fee: Amount,
    pub net: Amount,
}

/// Fee charged on a remittance of `gross`.
///
/// # Examples
///
/// ```
/// use zkredit_core::amount::Amount;
/// use zkredit_payment::compute_fee;
///
/// assert_eq!(compute_fee(Amount::from_whole(1_000)).to_string(), "7.00");
/// // Small transfers pay the 0.50 floor.
/// assert_eq!(compute_fee(Amount::from_whole(20)).to_string(), "0.50");
/// ```
pub fn compute_fee(gross: Amount) -> Amount {
    gross
        .mul_bps(REMITTANCE_FEE_BPS)
        .max(Amount::from_units(MIN_REMITTANCE_FEE))
}

/// Split `gross` into fee and net, rejecting transfers the fee would consume.
pub fn compute_net(gross: Amount) -> Result<FeeBreakdown, ValidationError> {
    if gross.is_zero() {
        return Err(ValidationError::NonPositiveAmount);
    }
    let fee = compute_fee(gross);
    match gross.checked_sub(fee) {
        Some(net) if !net.is_zero() => Ok(FeeBreakdown { gross, fee, net }),
        _ => Err(ValidationError::NonPositiveNet { gross, fee }),
    }
}

/// Convert a decimal amount to smallest units (round half away from zero).
///
/// Non-finite input and results that round to zero or below are rejected.
pub fn to_smallest_unit(amount: f64) -> Result<u64, ValidationError> {
    Amount::from_decimal(amount).map(Amount::units)
}
