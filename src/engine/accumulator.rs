use crate::domain::{AccumName, DecCoins, Decimal};
use serde::{Deserialize, Serialize};

use super::AccumError;

/// Named running total of cumulative reward per share.
///
/// Invariants:
/// - `value` never decreases outside of a validated administrative override
/// - `total_shares` equals the sum of all live positions' shares and is never negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorObject {
    name: AccumName,
    value: DecCoins,
    total_shares: Decimal,
}

impl AccumulatorObject {
    /// A fresh accumulator at zero value with no shares.
    pub fn new(name: AccumName) -> Self {
        Self {
            name,
            value: DecCoins::new(),
            total_shares: Decimal::zero(),
        }
    }

    /// Rebuild an accumulator from persisted parts.
    pub fn from_parts(name: AccumName, value: DecCoins, total_shares: Decimal) -> Self {
        Self {
            name,
            value,
            total_shares,
        }
    }

    pub fn name(&self) -> &AccumName {
        &self.name
    }

    /// Current cumulative reward per share.
    pub fn value(&self) -> &DecCoins {
        &self.value
    }

    pub fn total_shares(&self) -> Decimal {
        self.total_shares
    }

    /// Add newly accrued reward per share.
    ///
    /// # Errors
    /// Returns `InvalidDelta` if any denomination of `delta` is negative and
    /// `Overflow` if the sum leaves the decimal range; the value is left
    /// unchanged either way.
    pub fn increase_value(&mut self, delta: &DecCoins) -> Result<(), AccumError> {
        if delta.is_any_negative() {
            return Err(AccumError::InvalidDelta {
                delta: delta.clone(),
            });
        }
        self.value = self.value.checked_add(delta).ok_or(AccumError::Overflow {
            operation: "accumulator value increase",
        })?;
        Ok(())
    }

    /// Apply a signed change to the total share count.
    pub(crate) fn adjust_total_shares(&mut self, delta: Decimal) -> Result<(), AccumError> {
        let updated = self
            .total_shares
            .checked_add(delta)
            .ok_or(AccumError::Overflow {
                operation: "total share update",
            })?;
        if updated.is_negative() {
            return Err(AccumError::NegativeTotalShares {
                current: self.total_shares,
                delta,
            });
        }
        self.total_shares = updated;
        Ok(())
    }

    /// Replace the value. Callers validate with `validate_accumulator_value` first.
    pub(crate) fn set_value(&mut self, value: DecCoins) {
        self.value = value;
    }
}
