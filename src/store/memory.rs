use crate::domain::{AccumName, PositionIndex, Record};
use crate::engine::AccumulatorObject;
use std::collections::BTreeMap;

use super::AccumStore;

/// In-memory store. Position keys sort by (accumulator, index).
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    accumulators: BTreeMap<AccumName, AccumulatorObject>,
    positions: BTreeMap<(AccumName, PositionIndex), Record>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All live positions of one accumulator, ordered by index.
    ///
    /// Linear in the number of positions; meant for inspection and tests,
    /// never for settlement.
    pub fn positions_of<'a>(
        &'a self,
        name: &'a AccumName,
    ) -> impl Iterator<Item = (&'a PositionIndex, &'a Record)> + 'a {
        self.positions
            .iter()
            .filter(move |((accum, _), _)| accum == name)
            .map(|((_, index), record)| (index, record))
    }
}

impl AccumStore for MemStore {
    fn get_accumulator(&self, name: &AccumName) -> Option<AccumulatorObject> {
        self.accumulators.get(name).cloned()
    }

    fn set_accumulator(&mut self, accum: &AccumulatorObject) {
        self.accumulators.insert(accum.name().clone(), accum.clone());
    }

    fn get_position(&self, name: &AccumName, index: &PositionIndex) -> Option<Record> {
        self.positions.get(&(name.clone(), index.clone())).cloned()
    }

    fn set_position(&mut self, name: &AccumName, index: &PositionIndex, record: &Record) {
        self.positions
            .insert((name.clone(), index.clone()), record.clone());
    }

    fn delete_position(&mut self, name: &AccumName, index: &PositionIndex) {
        self.positions.remove(&(name.clone(), index.clone()));
    }
}
