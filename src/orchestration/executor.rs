use crate::db::{RepoError, Repository};
use crate::domain::{DecCoins, Operation};
use crate::engine::{AccumError, AccumulatorObject, Ledger};
use crate::store::{AccumStore, CacheStore, MemStore};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Result of one successfully committed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// State changed, nothing to hand back.
    Applied,
    /// A newly created accumulator.
    Accumulator(AccumulatorObject),
    /// Rewards to pay out from a claim.
    Payout(DecCoins),
    /// Settled rewards to pay out when a removal closed the position.
    Removed(Option<DecCoins>),
}

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Accum(#[from] AccumError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("administrative operations are disabled")]
    AdminDisabled,
}

/// Run one operation against a ledger and translate its return value.
pub fn apply_operation<S: AccumStore>(
    ledger: &mut Ledger<S>,
    op: &Operation,
) -> Result<OperationOutcome, AccumError> {
    let outcome = match op {
        Operation::CreateAccumulator { accum } => {
            OperationOutcome::Accumulator(ledger.create_accumulator(accum)?)
        }
        Operation::IncreaseValue { accum, delta } => {
            ledger.increase_value(accum, delta)?;
            OperationOutcome::Applied
        }
        Operation::DistributeRewards { accum, rewards } => {
            ledger.distribute_rewards(accum, rewards)?;
            OperationOutcome::Applied
        }
        Operation::CreatePosition {
            accum,
            index,
            num_shares,
            options,
        } => {
            ledger.create_position(accum, index, *num_shares, options.clone())?;
            OperationOutcome::Applied
        }
        Operation::AddToPosition {
            accum,
            index,
            delta,
            growth_outside,
        } => {
            ledger.add_to_position(accum, index, *delta, growth_outside)?;
            OperationOutcome::Applied
        }
        Operation::RemoveFromPosition {
            accum,
            index,
            delta,
            growth_outside,
        } => OperationOutcome::Removed(ledger.remove_from_position(
            accum,
            index,
            *delta,
            growth_outside,
        )?),
        Operation::ClaimRewards {
            accum,
            index,
            growth_outside,
        } => OperationOutcome::Payout(ledger.claim_rewards(accum, index, growth_outside)?),
        Operation::SetAccumulatorValue { accum, value } => {
            ledger.set_accumulator_value_admin(accum, value)?;
            OperationOutcome::Applied
        }
        Operation::SetPositionCustomAcc {
            accum,
            index,
            value,
        } => {
            ledger.set_position_custom_acc(accum, index, value)?;
            OperationOutcome::Applied
        }
        Operation::AddToPositionCustomAcc {
            accum,
            index,
            delta,
            value,
        } => {
            ledger.add_to_position_custom_acc(accum, index, *delta, value)?;
            OperationOutcome::Applied
        }
    };
    Ok(outcome)
}

/// Executes operations one at a time against the SQLite repository.
///
/// Each operation loads only the accumulator and position it touches, runs
/// against a write-buffering overlay and persists the buffered writes in one
/// database transaction. A failing operation writes nothing.
pub struct TxExecutor {
    repo: Arc<Repository>,
    allow_admin: bool,
    serial: Mutex<()>,
}

impl TxExecutor {
    pub fn new(repo: Arc<Repository>, allow_admin: bool) -> Self {
        Self {
            repo,
            allow_admin,
            serial: Mutex::new(()),
        }
    }

    pub async fn execute(&self, op: &Operation) -> Result<OperationOutcome, ExecutorError> {
        if op.is_admin() && !self.allow_admin {
            tracing::warn!(accum = %op.accum(), "Rejected administrative operation");
            return Err(ExecutorError::AdminDisabled);
        }

        let _guard = self.serial.lock().await;
        let mut snapshot = self.load_snapshot(op).await?;

        let (outcome, writes) = {
            let mut ledger = Ledger::new(CacheStore::new(&mut snapshot));
            let outcome = apply_operation(&mut ledger, op)?;
            (outcome, ledger.into_store().commit())
        };

        self.repo.apply_writes(&writes).await?;
        tracing::debug!(accum = %op.accum(), writes = writes.len(), "Committed operation");
        Ok(outcome)
    }

    async fn load_snapshot(&self, op: &Operation) -> Result<MemStore, RepoError> {
        let mut store = MemStore::new();
        let name = op.accum();
        if let Some(accum) = self.repo.load_accumulator(name).await? {
            store.set_accumulator(&accum);
        }
        if let Some(index) = op.index() {
            if let Some(record) = self.repo.load_position(name, index).await? {
                store.set_position(name, index, &record);
            }
        }
        Ok(store)
    }
}
