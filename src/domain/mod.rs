//! Domain types for the reward accumulator.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Multi-denomination coin sets (DecCoins)
//! - Identifiers: AccumName, PositionIndex
//! - The persisted position Record and its opaque options
//! - The serializable Operation enum consumed by the executor

pub mod coins;
pub mod decimal;
pub mod operation;
pub mod primitives;
pub mod record;

pub use coins::{CoinsParseError, DecCoins};
pub use decimal::Decimal;
pub use operation::Operation;
pub use primitives::{AccumName, PositionIndex};
pub use record::{PositionOptions, Record};
