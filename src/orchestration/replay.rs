//! Replay of JSON-lines operation logs through the executor.

use super::executor::{ExecutorError, OperationOutcome, TxExecutor};
use crate::domain::{DecCoins, Operation};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub failed: usize,
    /// Sum of every claim and closing-removal payout.
    pub payouts: DecCoins,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: invalid operation: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: {source}")]
    Execute {
        line: usize,
        #[source]
        source: ExecutorError,
    },
    #[error("line {line}: payout total overflowed the decimal range")]
    PayoutOverflow { line: usize },
}

/// Replay an operations file. Blank lines and lines starting with `#` are skipped.
pub async fn replay_file(
    executor: &TxExecutor,
    path: &Path,
    stop_on_error: bool,
) -> Result<ReplaySummary, ReplayError> {
    let input = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
    replay_str(executor, &input, stop_on_error).await
}

/// Replay operations given as JSON lines.
///
/// Malformed lines always abort. A failing operation aborts only when
/// `stop_on_error` is set; otherwise it is logged and counted.
pub async fn replay_str(
    executor: &TxExecutor,
    input: &str,
    stop_on_error: bool,
) -> Result<ReplaySummary, ReplayError> {
    let mut summary = ReplaySummary::default();

    for (offset, raw) in input.lines().enumerate() {
        let line = offset + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let op: Operation =
            serde_json::from_str(trimmed).map_err(|source| ReplayError::Parse { line, source })?;

        match executor.execute(&op).await {
            Ok(outcome) => {
                summary.applied += 1;
                match outcome {
                    OperationOutcome::Payout(paid) | OperationOutcome::Removed(Some(paid)) => {
                        info!(line, accum = %op.accum(), payout = %paid, "Paid out rewards");
                        summary.payouts = summary
                            .payouts
                            .checked_add(&paid)
                            .ok_or(ReplayError::PayoutOverflow { line })?;
                    }
                    _ => info!(line, accum = %op.accum(), "Applied operation"),
                }
            }
            Err(source) if stop_on_error => return Err(ReplayError::Execute { line, source }),
            Err(e) => {
                warn!(line, accum = %op.accum(), error = %e, "Operation failed, continuing");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
