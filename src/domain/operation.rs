//! Serializable form of every accumulator call, one per atomic transaction.

use super::{AccumName, DecCoins, Decimal, PositionIndex, PositionOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateAccumulator {
        accum: AccumName,
    },
    IncreaseValue {
        accum: AccumName,
        delta: DecCoins,
    },
    DistributeRewards {
        accum: AccumName,
        rewards: DecCoins,
    },
    CreatePosition {
        accum: AccumName,
        index: PositionIndex,
        num_shares: Decimal,
        #[serde(default)]
        options: Option<PositionOptions>,
    },
    AddToPosition {
        accum: AccumName,
        index: PositionIndex,
        delta: Decimal,
        #[serde(default)]
        growth_outside: DecCoins,
    },
    RemoveFromPosition {
        accum: AccumName,
        index: PositionIndex,
        delta: Decimal,
        #[serde(default)]
        growth_outside: DecCoins,
    },
    ClaimRewards {
        accum: AccumName,
        index: PositionIndex,
        #[serde(default)]
        growth_outside: DecCoins,
    },
    /// Administrative replacement of the accumulator value.
    SetAccumulatorValue {
        accum: AccumName,
        value: DecCoins,
    },
    /// Administrative rebase of one position's snapshot.
    SetPositionCustomAcc {
        accum: AccumName,
        index: PositionIndex,
        value: DecCoins,
    },
    /// Administrative share increase rebased onto a custom snapshot.
    AddToPositionCustomAcc {
        accum: AccumName,
        index: PositionIndex,
        delta: Decimal,
        value: DecCoins,
    },
}

impl Operation {
    /// Accumulator this operation touches.
    pub fn accum(&self) -> &AccumName {
        match self {
            Operation::CreateAccumulator { accum }
            | Operation::IncreaseValue { accum, .. }
            | Operation::DistributeRewards { accum, .. }
            | Operation::CreatePosition { accum, .. }
            | Operation::AddToPosition { accum, .. }
            | Operation::RemoveFromPosition { accum, .. }
            | Operation::ClaimRewards { accum, .. }
            | Operation::SetAccumulatorValue { accum, .. }
            | Operation::SetPositionCustomAcc { accum, .. }
            | Operation::AddToPositionCustomAcc { accum, .. } => accum,
        }
    }

    /// Position this operation touches, if any.
    pub fn index(&self) -> Option<&PositionIndex> {
        match self {
            Operation::CreatePosition { index, .. }
            | Operation::AddToPosition { index, .. }
            | Operation::RemoveFromPosition { index, .. }
            | Operation::ClaimRewards { index, .. }
            | Operation::SetPositionCustomAcc { index, .. }
            | Operation::AddToPositionCustomAcc { index, .. } => Some(index),
            Operation::CreateAccumulator { .. }
            | Operation::IncreaseValue { .. }
            | Operation::DistributeRewards { .. }
            | Operation::SetAccumulatorValue { .. } => None,
        }
    }

    /// Operations that may alter accrued value and need privileged callers.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Operation::SetAccumulatorValue { .. }
                | Operation::SetPositionCustomAcc { .. }
                | Operation::AddToPositionCustomAcc { .. }
        )
    }
}
