//! Settlement math and validation of administrative accumulator values.

use crate::domain::{DecCoins, Decimal, Record};

use super::{AccumError, AccumulatorObject};

/// Total rewards owed to `position`: its settled rewards plus everything accrued
/// per share since its snapshot, net of the caller-supplied `growth_outside`.
///
/// `rewards = unclaimed + shares * (accum.value - (init_accum_value + growth_outside))`
///
/// Precondition: `accum.value >= init_accum_value + growth_outside` in every
/// denomination. Only debug builds check it; a violation means the caller
/// computed `growth_outside` or the snapshot incorrectly.
///
/// # Errors
/// Returns `Overflow` if any intermediate amount leaves the decimal range.
pub fn compute_total_rewards(
    accum: &AccumulatorObject,
    position: &Record,
    growth_outside: &DecCoins,
) -> Result<DecCoins, AccumError> {
    let overflow = AccumError::Overflow {
        operation: "reward settlement",
    };
    let baseline = position
        .init_accum_value
        .checked_add(growth_outside)
        .ok_or_else(|| overflow.clone())?;
    let growth = accum
        .value()
        .checked_sub(&baseline)
        .ok_or_else(|| overflow.clone())?;
    debug_assert!(
        !growth.is_any_negative(),
        "accumulator {} value {} is below position baseline {}",
        accum.name(),
        accum.value(),
        baseline
    );

    growth
        .checked_mul_dec(position.num_shares)
        .and_then(|accrued| position.unclaimed_rewards.checked_add(&accrued))
        .ok_or(overflow)
}

/// Check that `custom` may replace `old` as an accumulator value.
///
/// # Errors
/// - `NegativeCustomAcc` if any denomination of `custom` is negative
/// - `NegativeAccDifference` if `custom` is below `old` in any denomination;
///   the reported deficit is `old - custom`
pub fn validate_accumulator_value(custom: &DecCoins, old: &DecCoins) -> Result<(), AccumError> {
    if custom.is_any_negative() {
        return Err(AccumError::NegativeCustomAcc {
            custom: custom.clone(),
        });
    }
    let deficit = old.checked_sub(custom).ok_or(AccumError::Overflow {
        operation: "accumulator value validation",
    })?;
    if !custom.is_all_gte(old) {
        return Err(AccumError::NegativeAccDifference { deficit });
    }
    Ok(())
}
