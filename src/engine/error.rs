use crate::domain::{AccumName, DecCoins, Decimal, PositionIndex};
use thiserror::Error;

/// Broad classification of accumulator failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidArgument,
    InvariantViolation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccumError {
    #[error("no position found for index {index}")]
    NoPosition { index: PositionIndex },
    #[error("accumulator {name} does not exist")]
    AccumDoesNotExist { name: AccumName },
    #[error("position {index} already exists")]
    DuplicatePosition { index: PositionIndex },
    #[error("accumulator {name} already exists")]
    AccumAlreadyExists { name: AccumName },
    #[error("share amount must be positive, got {shares}")]
    ZeroShares { shares: Decimal },
    #[error("cannot remove {requested} shares, position only holds {available}")]
    InsufficientShares {
        requested: Decimal,
        available: Decimal,
    },
    #[error("accumulator delta must be non-negative in every denomination, got {delta}")]
    InvalidDelta { delta: DecCoins },
    #[error("total shares would become negative: {current} + {delta}")]
    NegativeTotalShares { current: Decimal, delta: Decimal },
    #[error("accumulator {name} has no shares to distribute rewards over")]
    NoShares { name: AccumName },
    #[error("{operation} overflowed the decimal range")]
    Overflow { operation: &'static str },
    #[error("custom accumulator value must be non-negative, got {custom}")]
    NegativeCustomAcc { custom: DecCoins },
    #[error("custom accumulator value is smaller than the value it replaces by {deficit}")]
    NegativeAccDifference { deficit: DecCoins },
}

impl AccumError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccumError::NoPosition { .. } | AccumError::AccumDoesNotExist { .. } => {
                ErrorKind::NotFound
            }
            AccumError::DuplicatePosition { .. } | AccumError::AccumAlreadyExists { .. } => {
                ErrorKind::Conflict
            }
            AccumError::ZeroShares { .. }
            | AccumError::InsufficientShares { .. }
            | AccumError::InvalidDelta { .. }
            | AccumError::NegativeTotalShares { .. }
            | AccumError::NoShares { .. }
            | AccumError::Overflow { .. } => ErrorKind::InvalidArgument,
            AccumError::NegativeCustomAcc { .. } | AccumError::NegativeAccDifference { .. } => {
                ErrorKind::InvariantViolation
            }
        }
    }
}
