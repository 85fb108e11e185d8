use super::info::BeaconReceptionInfo;
use super::transition::TransitionEvent;
use super::NodeId;
use crate::time::SimTime;
use std::cell::RefCell;
use std::rc::Rc;

/// Receiver of cell-occupancy events from a [`super::NeighborhoodTable`].
///
/// `on_leave_cell` is always followed by `on_enter_cell` for the same record;
/// the cell that is left is the one of the prior snapshot.
pub trait NeighborhoodEntryListener {
    fn on_enter_cell(&mut self, _info: &BeaconReceptionInfo) {}
    fn on_leave_cell(&mut self, _info: &BeaconReceptionInfo) {}
    fn on_stay_in_cell(&mut self, _info: &BeaconReceptionInfo) {}
    fn on_removed(&mut self, _info: &BeaconReceptionInfo) {}
    fn on_dropped(&mut self, _info: &BeaconReceptionInfo) {}

    /// Table membership changed; `size` is the raw entry count.
    fn on_table_changed(&mut self, _owner_id: NodeId, _size: usize, _now: SimTime) {}
}

pub type SharedListener = Rc<RefCell<dyn NeighborhoodEntryListener>>;

pub(crate) fn dispatch(
    listener: &mut dyn NeighborhoodEntryListener,
    event: TransitionEvent,
    info: &BeaconReceptionInfo,
) {
    match event {
        TransitionEvent::EnterCell => listener.on_enter_cell(info),
        TransitionEvent::LeaveCell => listener.on_leave_cell(info),
        TransitionEvent::StayInCell => listener.on_stay_in_cell(info),
        TransitionEvent::Removed => listener.on_removed(info),
        TransitionEvent::Dropped => listener.on_dropped(info),
    }
}

/// Listener that remembers every event in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingListener {
    pub events: Vec<(NodeId, TransitionEvent)>,
    pub table_sizes: Vec<usize>,
}

#[cfg(test)]
impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn take(&mut self) -> Vec<(NodeId, TransitionEvent)> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
impl NeighborhoodEntryListener for RecordingListener {
    fn on_enter_cell(&mut self, info: &BeaconReceptionInfo) {
        self.events.push((info.get_node_id(), TransitionEvent::EnterCell));
    }

    fn on_leave_cell(&mut self, info: &BeaconReceptionInfo) {
        self.events.push((info.get_node_id(), TransitionEvent::LeaveCell));
    }

    fn on_stay_in_cell(&mut self, info: &BeaconReceptionInfo) {
        self.events.push((info.get_node_id(), TransitionEvent::StayInCell));
    }

    fn on_removed(&mut self, info: &BeaconReceptionInfo) {
        self.events.push((info.get_node_id(), TransitionEvent::Removed));
    }

    fn on_dropped(&mut self, info: &BeaconReceptionInfo) {
        self.events.push((info.get_node_id(), TransitionEvent::Dropped));
    }

    fn on_table_changed(&mut self, _owner_id: NodeId, size: usize, _now: SimTime) {
        self.table_sizes.push(size);
    }
}
