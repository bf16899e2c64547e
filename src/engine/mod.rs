//! Pure reward-accumulator engine.
//!
//! Nothing in here performs I/O; state flows through an [`crate::store::AccumStore`].
//! Settlement is O(1) per position: the accumulator tracks cumulative reward
//! per share and each position remembers the value it last settled at.

pub mod accumulator;
pub mod error;
pub mod lifecycle;
pub mod position;
pub mod rewards;

pub use accumulator::AccumulatorObject;
pub use error::{AccumError, ErrorKind};
pub use lifecycle::Ledger;
pub use rewards::{compute_total_rewards, validate_accumulator_value};
