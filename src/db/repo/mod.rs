//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by domain:
//! - `accumulators.rs` - accumulator rows
//! - `positions.rs` - position record rows
//!
//! Decimals and coin sets are stored as canonical strings so that no value is
//! ever rounded through SQLite's REAL type.

mod accumulators;
mod positions;

use crate::domain::{DecCoins, Decimal};
use crate::store::StoreWrite;
use sqlx::sqlite::SqlitePool;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("corrupt {column} value {value:?}: {reason}")]
    Decode {
        column: &'static str,
        value: String,
        reason: String,
    },
}

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Persist buffered store writes in order inside a single transaction.
    ///
    /// Either every write lands or none does.
    ///
    /// # Errors
    /// Returns an error if any statement or the commit fails.
    pub async fn apply_writes(&self, writes: &[StoreWrite]) -> Result<(), RepoError> {
        if writes.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for write in writes {
            match write {
                StoreWrite::Accumulator(accum) => {
                    Self::upsert_accumulator(&mut tx, accum).await?;
                }
                StoreWrite::Position {
                    accum,
                    index,
                    record,
                } => {
                    Self::upsert_position(&mut tx, accum, index, record).await?;
                }
                StoreWrite::DeletePosition { accum, index } => {
                    Self::delete_position_row(&mut tx, accum, index).await?;
                }
            }
        }
        tx.commit().await?;
        Ok(())
    }
}

fn decode_decimal(column: &'static str, raw: &str) -> Result<Decimal, RepoError> {
    Decimal::from_str(raw).map_err(|e| {
        warn!(column, value = %raw, error = %e, "Failed to parse stored decimal");
        RepoError::Decode {
            column,
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })
}

fn decode_coins(column: &'static str, raw: &str) -> Result<DecCoins, RepoError> {
    DecCoins::from_str(raw).map_err(|e| {
        warn!(column, value = %raw, error = %e, "Failed to parse stored coins");
        RepoError::Decode {
            column,
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })
}
