//! Position record access.

use crate::domain::{AccumName, DecCoins, Decimal, PositionIndex, PositionOptions, Record};
use crate::store::AccumStore;

use super::{AccumError, AccumulatorObject};

/// Write a position snapshotted at the accumulator's current value.
///
/// Used both for creation and for rebasing right after a settlement. Total
/// shares are the caller's responsibility.
pub fn init_or_update_position<S: AccumStore + ?Sized>(
    store: &mut S,
    accum: &AccumulatorObject,
    index: &PositionIndex,
    num_shares: Decimal,
    unclaimed_rewards: DecCoins,
    options: Option<PositionOptions>,
) {
    init_or_update_position_custom_acc(
        store,
        accum.name(),
        accum.value().clone(),
        index,
        num_shares,
        unclaimed_rewards,
        options,
    );
}

/// Write a position snapshotted at an explicit accumulator value.
pub fn init_or_update_position_custom_acc<S: AccumStore + ?Sized>(
    store: &mut S,
    name: &AccumName,
    accum_value: DecCoins,
    index: &PositionIndex,
    num_shares: Decimal,
    unclaimed_rewards: DecCoins,
    options: Option<PositionOptions>,
) {
    let record = Record {
        num_shares,
        init_accum_value: accum_value,
        unclaimed_rewards,
        options,
    };
    store.set_position(name, index, &record);
}

/// Fetch a position or fail with `NoPosition`.
pub fn get_position<S: AccumStore + ?Sized>(
    store: &S,
    name: &AccumName,
    index: &PositionIndex,
) -> Result<Record, AccumError> {
    store
        .get_position(name, index)
        .ok_or_else(|| AccumError::NoPosition {
            index: index.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    #[test]
    fn test_init_snapshots_current_value() {
        let mut store = MemStore::new();
        let accum = AccumulatorObject::from_parts(
            AccumName::new("pool/1"),
            "0.25uatom".parse().unwrap(),
            Decimal::zero(),
        );
        let index = PositionIndex::new("a");

        init_or_update_position(
            &mut store,
            &accum,
            &index,
            Decimal::from(4),
            "1uosmo".parse().unwrap(),
            None,
        );

        let record = get_position(&store, accum.name(), &index).unwrap();
        assert_eq!(record.init_accum_value, "0.25uatom".parse().unwrap());
        assert_eq!(record.num_shares, Decimal::from(4));
        assert_eq!(record.unclaimed_rewards, "1uosmo".parse().unwrap());
    }

    #[test]
    fn test_get_missing_position() {
        let store = MemStore::new();
        let err = get_position(&store, &AccumName::new("pool/1"), &PositionIndex::new("x"))
            .unwrap_err();
        assert_eq!(
            err,
            AccumError::NoPosition {
                index: PositionIndex::new("x")
            }
        );
    }
}
