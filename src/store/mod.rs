//! Key-value contract the engine persists through.
//!
//! This module provides:
//! - The `AccumStore` trait keyed by accumulator name and (name, position index)
//! - `MemStore`, a plain in-memory implementation
//! - `CacheStore`, a write-buffering overlay that commits all writes or none

mod cache;
mod memory;

pub use cache::CacheStore;
pub use memory::MemStore;

use crate::domain::{AccumName, PositionIndex, Record};
use crate::engine::AccumulatorObject;

/// Synchronous get/set/has/delete access to accumulators and position records.
pub trait AccumStore {
    fn get_accumulator(&self, name: &AccumName) -> Option<AccumulatorObject>;

    fn set_accumulator(&mut self, accum: &AccumulatorObject);

    fn get_position(&self, name: &AccumName, index: &PositionIndex) -> Option<Record>;

    fn has_position(&self, name: &AccumName, index: &PositionIndex) -> bool {
        self.get_position(name, index).is_some()
    }

    fn set_position(&mut self, name: &AccumName, index: &PositionIndex, record: &Record);

    fn delete_position(&mut self, name: &AccumName, index: &PositionIndex);
}

/// A single buffered mutation, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    Accumulator(AccumulatorObject),
    Position {
        accum: AccumName,
        index: PositionIndex,
        record: Record,
    },
    DeletePosition {
        accum: AccumName,
        index: PositionIndex,
    },
}

impl StoreWrite {
    /// Replay this write onto `store`.
    pub fn apply_to<S: AccumStore + ?Sized>(&self, store: &mut S) {
        match self {
            StoreWrite::Accumulator(accum) => store.set_accumulator(accum),
            StoreWrite::Position {
                accum,
                index,
                record,
            } => store.set_position(accum, index, record),
            StoreWrite::DeletePosition { accum, index } => store.delete_position(accum, index),
        }
    }
}
