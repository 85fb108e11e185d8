use super::density::DensityCounter;
use crate::error::NeighborhoodError;
use crate::neighborhood::{
    BeaconPool, CellKeyProvider, NeighborhoodTable, NodeId, SharedListener, Snapshot, Transition,
};
use crate::time::{SimTime, TimerId};
use std::cell::RefCell;
use std::rc::Rc;

/// A simulated node: its reception records, neighborhood table and local
/// density map.
pub struct Node {
    pub id: NodeId,
    pub pool: BeaconPool,
    pub table: NeighborhoodTable,
    pub density: Rc<RefCell<DensityCounter>>,
}

impl Node {
    pub fn new(
        id: NodeId,
        max_age: SimTime,
        cell_key_provider: Rc<dyn CellKeyProvider>,
    ) -> Result<Self, NeighborhoodError> {
        let mut table = NeighborhoodTable::new(id, max_age, cell_key_provider.clone())?;
        let density = Rc::new(RefCell::new(DensityCounter::new(cell_key_provider)));
        table.register_listener(density.clone());

        Ok(Self {
            id,
            pool: BeaconPool::new(),
            table,
            density,
        })
    }

    pub fn register_listener(&mut self, listener: SharedListener) {
        self.table.register_listener(listener);
    }

    pub fn receive_beacon(
        &mut self,
        sender: NodeId,
        snapshot: Snapshot,
        now: SimTime,
    ) -> Option<Transition> {
        self.table.process(&mut self.pool, sender, snapshot, now)
    }

    pub fn start(&mut self, timer: TimerId, now: SimTime) -> SimTime {
        self.table.start(timer, now)
    }

    pub fn handle_timer(&mut self, timer: TimerId, now: SimTime) -> Result<SimTime, NeighborhoodError> {
        self.table.handle_timer(&mut self.pool, timer, now)
    }

    pub fn shutdown(&mut self) -> Option<TimerId> {
        self.table.shutdown()
    }

    pub fn neighbor_count(&mut self, now: SimTime) -> usize {
        self.table.live_size(&mut self.pool, now)
    }
}
