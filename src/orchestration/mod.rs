//! Atomic execution of accumulator operations against the database.

pub mod executor;
pub mod replay;

pub use executor::{apply_operation, ExecutorError, OperationOutcome, TxExecutor};
pub use replay::{replay_file, replay_str, ReplayError, ReplaySummary};
