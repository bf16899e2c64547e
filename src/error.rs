use crate::config::ConfigError;
use crate::db::RepoError;
use crate::orchestration::{ExecutorError, ReplayError};
use thiserror::Error;

/// Top-level error for the replay binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Replay failed: {0}")]
    Replay(#[from] ReplayError),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl AppError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Database(_) => 3,
            AppError::Replay(ReplayError::Execute {
                source: ExecutorError::Repo(_),
                ..
            }) => 3,
            AppError::Replay(_) => 1,
        }
    }
}
