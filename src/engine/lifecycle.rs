//! Position lifecycle: create, add, remove, claim, and the admin override path.
//!
//! Every operation validates all inputs before its first write, then settles
//! the position, rewrites it against the current accumulator value and stores
//! the updated accumulator. Run it over a [`crate::store::CacheStore`] when
//! the surrounding host needs all-or-nothing commits.

use crate::domain::{AccumName, DecCoins, Decimal, PositionIndex, PositionOptions, Record};
use crate::store::AccumStore;
use tracing::debug;

use super::position::{get_position, init_or_update_position, init_or_update_position_custom_acc};
use super::rewards::{compute_total_rewards, validate_accumulator_value};
use super::{AccumError, AccumulatorObject};

/// Accumulator operations over an explicit store.
///
/// Accumulators are addressed by name on every call; the ledger keeps no
/// state besides the store it wraps.
#[derive(Debug, Default)]
pub struct Ledger<S: AccumStore> {
    store: S,
}

impl<S: AccumStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // =========================================================================
    // Accumulators
    // =========================================================================

    /// Create an accumulator at zero value with no shares.
    pub fn create_accumulator(&mut self, name: &AccumName) -> Result<AccumulatorObject, AccumError> {
        if self.store.get_accumulator(name).is_some() {
            return Err(AccumError::AccumAlreadyExists { name: name.clone() });
        }
        let accum = AccumulatorObject::new(name.clone());
        self.store.set_accumulator(&accum);
        debug!(accum = %name, "created accumulator");
        Ok(accum)
    }

    pub fn get_accumulator(&self, name: &AccumName) -> Option<AccumulatorObject> {
        self.store.get_accumulator(name)
    }

    pub fn must_get_accumulator(&self, name: &AccumName) -> Result<AccumulatorObject, AccumError> {
        self.store
            .get_accumulator(name)
            .ok_or_else(|| AccumError::AccumDoesNotExist { name: name.clone() })
    }

    pub fn get_total_shares(&self, name: &AccumName) -> Result<Decimal, AccumError> {
        Ok(self.must_get_accumulator(name)?.total_shares())
    }

    /// Add per-share growth to the accumulator.
    pub fn increase_value(&mut self, name: &AccumName, delta: &DecCoins) -> Result<(), AccumError> {
        let mut accum = self.must_get_accumulator(name)?;
        accum.increase_value(delta)?;
        self.store.set_accumulator(&accum);
        debug!(accum = %name, delta = %delta, value = %accum.value(), "increased accumulator value");
        Ok(())
    }

    /// Spread a reward total evenly over the current shares.
    ///
    /// # Errors
    /// `InvalidDelta` for negative rewards, `NoShares` when nobody holds shares.
    pub fn distribute_rewards(
        &mut self,
        name: &AccumName,
        rewards: &DecCoins,
    ) -> Result<(), AccumError> {
        let accum = self.must_get_accumulator(name)?;
        if rewards.is_any_negative() {
            return Err(AccumError::InvalidDelta {
                delta: rewards.clone(),
            });
        }
        if accum.total_shares().is_zero() {
            return Err(AccumError::NoShares { name: name.clone() });
        }
        let per_share = rewards
            .checked_quo_dec(accum.total_shares())
            .ok_or(AccumError::Overflow {
                operation: "reward distribution",
            })?;
        self.increase_value(name, &per_share)
    }

    /// Replace the accumulator value with a validated superset of the current one.
    pub fn set_accumulator_value_admin(
        &mut self,
        name: &AccumName,
        custom: &DecCoins,
    ) -> Result<(), AccumError> {
        let mut accum = self.must_get_accumulator(name)?;
        validate_accumulator_value(custom, accum.value())?;
        accum.set_value(custom.clone());
        self.store.set_accumulator(&accum);
        debug!(accum = %name, value = %custom, "accumulator value overridden");
        Ok(())
    }

    // =========================================================================
    // Positions
    // =========================================================================

    pub fn has_position(&self, name: &AccumName, index: &PositionIndex) -> bool {
        self.store.has_position(name, index)
    }

    pub fn get_position(&self, name: &AccumName, index: &PositionIndex) -> Result<Record, AccumError> {
        get_position(&self.store, name, index)
    }

    pub fn get_position_size(
        &self,
        name: &AccumName,
        index: &PositionIndex,
    ) -> Result<Decimal, AccumError> {
        Ok(self.get_position(name, index)?.num_shares)
    }

    /// Rewards `claim_rewards` would pay right now, without touching state.
    pub fn preview_rewards(
        &self,
        name: &AccumName,
        index: &PositionIndex,
        growth_outside: &DecCoins,
    ) -> Result<DecCoins, AccumError> {
        let accum = self.must_get_accumulator(name)?;
        let position = self.get_position(name, index)?;
        compute_total_rewards(&accum, &position, growth_outside)
    }

    /// Open a new position at the current accumulator value.
    pub fn create_position(
        &mut self,
        name: &AccumName,
        index: &PositionIndex,
        num_shares: Decimal,
        options: Option<PositionOptions>,
    ) -> Result<(), AccumError> {
        let mut accum = self.must_get_accumulator(name)?;
        if self.store.has_position(name, index) {
            return Err(AccumError::DuplicatePosition {
                index: index.clone(),
            });
        }
        require_positive(num_shares)?;
        accum.adjust_total_shares(num_shares)?;

        init_or_update_position(
            &mut self.store,
            &accum,
            index,
            num_shares,
            DecCoins::new(),
            options,
        );
        self.store.set_accumulator(&accum);
        debug!(accum = %name, index = %index, shares = %num_shares, "created position");
        Ok(())
    }

    /// Settle the position and grow it by `delta` shares.
    pub fn add_to_position(
        &mut self,
        name: &AccumName,
        index: &PositionIndex,
        delta: Decimal,
        growth_outside: &DecCoins,
    ) -> Result<(), AccumError> {
        require_positive(delta)?;
        let mut accum = self.must_get_accumulator(name)?;
        let position = self.get_position(name, index)?;

        let unclaimed = compute_total_rewards(&accum, &position, growth_outside)?;
        accum.adjust_total_shares(delta)?;
        let num_shares = grow_shares(position.num_shares, delta)?;

        init_or_update_position(
            &mut self.store,
            &accum,
            index,
            num_shares,
            unclaimed,
            position.options,
        );
        self.store.set_accumulator(&accum);
        debug!(accum = %name, index = %index, delta = %delta, shares = %num_shares, "added to position");
        Ok(())
    }

    /// Settle the position and shrink it by `delta` shares.
    ///
    /// When no shares remain the record is deleted and its settled rewards are
    /// returned for payout; otherwise returns `None`.
    pub fn remove_from_position(
        &mut self,
        name: &AccumName,
        index: &PositionIndex,
        delta: Decimal,
        growth_outside: &DecCoins,
    ) -> Result<Option<DecCoins>, AccumError> {
        require_positive(delta)?;
        let mut accum = self.must_get_accumulator(name)?;
        let position = self.get_position(name, index)?;
        if delta > position.num_shares {
            return Err(AccumError::InsufficientShares {
                requested: delta,
                available: position.num_shares,
            });
        }

        let unclaimed = compute_total_rewards(&accum, &position, growth_outside)?;
        accum.adjust_total_shares(-delta)?;
        let remaining = position.num_shares - delta;

        let payout = if remaining.is_zero() {
            self.store.delete_position(name, index);
            debug!(accum = %name, index = %index, rewards = %unclaimed, "closed position");
            Some(unclaimed)
        } else {
            init_or_update_position(
                &mut self.store,
                &accum,
                index,
                remaining,
                unclaimed,
                position.options,
            );
            debug!(accum = %name, index = %index, delta = %delta, shares = %remaining, "removed from position");
            None
        };
        self.store.set_accumulator(&accum);
        Ok(payout)
    }

    /// Settle the position and hand all of its rewards to the caller.
    pub fn claim_rewards(
        &mut self,
        name: &AccumName,
        index: &PositionIndex,
        growth_outside: &DecCoins,
    ) -> Result<DecCoins, AccumError> {
        let accum = self.must_get_accumulator(name)?;
        let position = self.get_position(name, index)?;

        let rewards = compute_total_rewards(&accum, &position, growth_outside)?;
        init_or_update_position(
            &mut self.store,
            &accum,
            index,
            position.num_shares,
            DecCoins::new(),
            position.options,
        );
        debug!(accum = %name, index = %index, rewards = %rewards, "claimed rewards");
        Ok(rewards)
    }

    // =========================================================================
    // Custom snapshots (migrations)
    // =========================================================================

    /// Rebase a position's snapshot onto `custom` without settling.
    ///
    /// `custom` must be a non-negative superset of the position's current
    /// snapshot. It is not checked against the live accumulator value; callers
    /// must keep it at or below that value.
    ///
    /// # Panics
    /// A snapshot above the accumulator value makes the next settlement of this
    /// position panic in debug builds and pay out negative rewards in release
    /// builds.
    pub fn set_position_custom_acc(
        &mut self,
        name: &AccumName,
        index: &PositionIndex,
        custom: &DecCoins,
    ) -> Result<(), AccumError> {
        self.must_get_accumulator(name)?;
        let position = self.get_position(name, index)?;
        validate_accumulator_value(custom, &position.init_accum_value)?;

        init_or_update_position_custom_acc(
            &mut self.store,
            name,
            custom.clone(),
            index,
            position.num_shares,
            position.unclaimed_rewards,
            position.options,
        );
        debug!(accum = %name, index = %index, snapshot = %custom, "position snapshot overridden");
        Ok(())
    }

    /// Settle, grow by `delta` shares and rebase onto `custom` instead of the
    /// live accumulator value.
    pub fn add_to_position_custom_acc(
        &mut self,
        name: &AccumName,
        index: &PositionIndex,
        delta: Decimal,
        custom: &DecCoins,
    ) -> Result<(), AccumError> {
        require_positive(delta)?;
        let mut accum = self.must_get_accumulator(name)?;
        let position = self.get_position(name, index)?;
        validate_accumulator_value(custom, &position.init_accum_value)?;

        let unclaimed = compute_total_rewards(&accum, &position, &DecCoins::new())?;
        accum.adjust_total_shares(delta)?;
        let num_shares = grow_shares(position.num_shares, delta)?;

        init_or_update_position_custom_acc(
            &mut self.store,
            name,
            custom.clone(),
            index,
            num_shares,
            unclaimed,
            position.options,
        );
        self.store.set_accumulator(&accum);
        debug!(accum = %name, index = %index, delta = %delta, snapshot = %custom, "added to position at custom snapshot");
        Ok(())
    }
}

fn grow_shares(current: Decimal, delta: Decimal) -> Result<Decimal, AccumError> {
    current.checked_add(delta).ok_or(AccumError::Overflow {
        operation: "position share update",
    })
}

fn require_positive(shares: Decimal) -> Result<(), AccumError> {
    if shares.is_positive() {
        Ok(())
    } else {
        Err(AccumError::ZeroShares { shares })
    }
}
