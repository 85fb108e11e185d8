use crate::neighborhood::{BeaconReceptionInfo, CellId, CellKeyProvider, NeighborhoodEntryListener, NodeId};
use crate::time::SimTime;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellCount {
    pub count: u32,
    pub measured_at: SimTime,
}

/// Node density per cell as seen by one node.
///
/// Remembers the cell each neighbor was counted in, so expiry events subtract
/// from the right cell no matter which snapshot is current.
pub struct DensityCounter {
    cell_key_provider: Rc<dyn CellKeyProvider>,
    cells: HashMap<CellId, CellCount>,
    placement: HashMap<NodeId, CellId>,
    underflows: u32,
}

impl DensityCounter {
    pub fn new(cell_key_provider: Rc<dyn CellKeyProvider>) -> Self {
        Self {
            cell_key_provider,
            cells: HashMap::new(),
            placement: HashMap::new(),
            underflows: 0,
        }
    }

    pub fn get_count(&self, cell: &CellId) -> u32 {
        self.cells.get(cell).map(|c| c.count).unwrap_or(0)
    }

    pub fn get_cell(&self, cell: &CellId) -> Option<&CellCount> {
        self.cells.get(cell)
    }

    /// Occupied cells in cell order.
    pub fn occupied(&self) -> Vec<(CellId, u32)> {
        let mut cells: Vec<(CellId, u32)> = self
            .cells
            .iter()
            .filter(|(_, c)| c.count > 0)
            .map(|(id, c)| (*id, c.count))
            .collect();
        cells.sort_unstable();
        cells
    }

    pub fn total(&self) -> u32 {
        self.cells.values().map(|c| c.count).sum()
    }

    pub fn get_underflows(&self) -> u32 {
        self.underflows
    }

    pub fn is_counted(&self, node_id: NodeId) -> bool {
        self.placement.contains_key(&node_id)
    }

    fn increment(&mut self, cell: CellId, now: SimTime) {
        let entry = self.cells.entry(cell).or_default();
        entry.count += 1;
        entry.measured_at = now;
    }

    fn decrement(&mut self, cell: CellId) {
        let entry = self.cells.entry(cell).or_default();
        if entry.count == 0 {
            self.underflows += 1;
        } else {
            entry.count -= 1;
        }
    }

    fn uncount(&mut self, node_id: NodeId) {
        if let Some(cell) = self.placement.remove(&node_id) {
            self.decrement(cell);
        }
    }
}

impl NeighborhoodEntryListener for DensityCounter {
    fn on_enter_cell(&mut self, info: &BeaconReceptionInfo) {
        let Some(current) = info.get_current() else {
            return;
        };
        let cell = self.cell_key_provider.cell_of(&current.position);
        self.uncount(info.get_node_id());
        self.placement.insert(info.get_node_id(), cell);
        self.increment(cell, current.received_time);
    }

    fn on_leave_cell(&mut self, info: &BeaconReceptionInfo) {
        self.uncount(info.get_node_id());
    }

    fn on_stay_in_cell(&mut self, info: &BeaconReceptionInfo) {
        let (Some(current), Some(cell)) = (info.get_current(), self.placement.get(&info.get_node_id())) else {
            return;
        };
        let entry = self.cells.entry(*cell).or_default();
        entry.measured_at = current.received_time;
    }

    fn on_removed(&mut self, info: &BeaconReceptionInfo) {
        self.uncount(info.get_node_id());
    }

    fn on_dropped(&mut self, info: &BeaconReceptionInfo) {
        // only a no-op for nodes that never entered
        self.uncount(info.get_node_id());
    }
}
