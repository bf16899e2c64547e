use crate::domain::{AccumName, PositionIndex, Record};
use crate::engine::AccumulatorObject;
use std::collections::BTreeMap;

use super::{AccumStore, StoreWrite};

/// Write-buffering overlay over a parent store.
///
/// Reads see the overlay first, then the parent. Nothing reaches the parent
/// until [`CacheStore::commit`]; dropping the overlay discards every write.
pub struct CacheStore<'a, S: AccumStore> {
    parent: &'a mut S,
    accumulators: BTreeMap<AccumName, AccumulatorObject>,
    // None marks a deleted position.
    positions: BTreeMap<(AccumName, PositionIndex), Option<Record>>,
    writes: Vec<StoreWrite>,
}

impl<'a, S: AccumStore> CacheStore<'a, S> {
    pub fn new(parent: &'a mut S) -> Self {
        Self {
            parent,
            accumulators: BTreeMap::new(),
            positions: BTreeMap::new(),
            writes: Vec::new(),
        }
    }

    /// Buffered writes in the order they were made.
    pub fn writes(&self) -> &[StoreWrite] {
        &self.writes
    }

    /// Apply every buffered write to the parent and return them.
    pub fn commit(self) -> Vec<StoreWrite> {
        let CacheStore { parent, writes, .. } = self;
        for write in &writes {
            write.apply_to(&mut *parent);
        }
        writes
    }
}

impl<S: AccumStore> AccumStore for CacheStore<'_, S> {
    fn get_accumulator(&self, name: &AccumName) -> Option<AccumulatorObject> {
        match self.accumulators.get(name) {
            Some(accum) => Some(accum.clone()),
            None => self.parent.get_accumulator(name),
        }
    }

    fn set_accumulator(&mut self, accum: &AccumulatorObject) {
        self.accumulators.insert(accum.name().clone(), accum.clone());
        self.writes.push(StoreWrite::Accumulator(accum.clone()));
    }

    fn get_position(&self, name: &AccumName, index: &PositionIndex) -> Option<Record> {
        match self.positions.get(&(name.clone(), index.clone())) {
            Some(cached) => cached.clone(),
            None => self.parent.get_position(name, index),
        }
    }

    fn set_position(&mut self, name: &AccumName, index: &PositionIndex, record: &Record) {
        self.positions
            .insert((name.clone(), index.clone()), Some(record.clone()));
        self.writes.push(StoreWrite::Position {
            accum: name.clone(),
            index: index.clone(),
            record: record.clone(),
        });
    }

    fn delete_position(&mut self, name: &AccumName, index: &PositionIndex) {
        self.positions.insert((name.clone(), index.clone()), None);
        self.writes.push(StoreWrite::DeletePosition {
            accum: name.clone(),
            index: index.clone(),
        });
    }
}
