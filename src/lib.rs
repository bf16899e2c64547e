pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod store;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{AccumName, DecCoins, Decimal, Operation, PositionIndex, PositionOptions, Record};
pub use engine::{AccumError, AccumulatorObject, ErrorKind, Ledger};
pub use error::AppError;
pub use orchestration::{OperationOutcome, TxExecutor};
pub use store::{AccumStore, CacheStore, MemStore};
