use super::scheduler::{EventQueue, SimEvent};
use crate::error::SimError;
use crate::neighborhood::{NodeId, Snapshot};
use crate::sim::node::Node;
use crate::time::{SimTime, TimerId};
use std::collections::BTreeMap;
use tracing::{debug, error};

pub struct Nodes {
    pub nodes: BTreeMap<NodeId, Node>,
}

impl Nodes {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id, n)).collect(),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start_timers(&mut self, queue: &mut EventQueue, now: SimTime) {
        for node in self.nodes.values_mut() {
            let timer = queue.new_timer();
            let at = node.start(timer, now);
            queue.schedule_at(at, SimEvent::Timer { node: node.id, timer });
        }
    }

    pub fn handle_event(
        &mut self,
        queue: &mut EventQueue,
        event: SimEvent,
        now: SimTime,
    ) -> Result<(), SimError> {
        match event {
            SimEvent::Beacon {
                receiver,
                sender,
                snapshot,
            } => self.deliver(receiver, sender, snapshot, now),
            SimEvent::Timer { node, timer } => self.fire_timer(queue, node, timer, now),
        }
    }

    pub fn deliver(
        &mut self,
        receiver: NodeId,
        sender: NodeId,
        snapshot: Snapshot,
        now: SimTime,
    ) -> Result<(), SimError> {
        let node = self
            .nodes
            .get_mut(&receiver)
            .ok_or(SimError::UnknownNode(receiver))?;
        let result = node.receive_beacon(sender, snapshot, now);
        debug!(receiver, sender, ?result, "beacon delivered at {now}");
        Ok(())
    }

    fn fire_timer(
        &mut self,
        queue: &mut EventQueue,
        node_id: NodeId,
        timer: TimerId,
        now: SimTime,
    ) -> Result<(), SimError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(SimError::UnknownNode(node_id))?;
        let next = node.handle_timer(timer, now).map_err(|e| {
            error!("node {node_id} stopped: {e}");
            e
        })?;
        queue.schedule_at(next, SimEvent::Timer { node: node_id, timer });
        Ok(())
    }

    pub fn shutdown(&mut self, queue: &mut EventQueue) {
        for node in self.nodes.values_mut() {
            if let Some(timer) = node.shutdown() {
                queue.cancel(timer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NeighborhoodError;
    use crate::neighborhood::{CellKeyProvider, Coord, GridCellKeyProvider};
    use std::rc::Rc;

    fn secs(s: f64) -> SimTime {
        SimTime::from_secs_f64(s)
    }

    fn nodes(ids: &[NodeId]) -> Nodes {
        let grid: Rc<dyn CellKeyProvider> =
            Rc::new(GridCellKeyProvider::new(Coord::new(0.0, 0.0), 10.0).unwrap());
        Nodes::new(
            ids.iter()
                .map(|id| Node::new(*id, secs(2.0), grid.clone()).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_timers_expire_entries() {
        let mut queue = EventQueue::new();
        let mut nodes = nodes(&[0, 1]);
        nodes.start_timers(&mut queue, SimTime::ZERO);

        let snapshot = Snapshot::new(secs(0.5), secs(0.5), Coord::new(1.0, 1.0));
        queue.schedule_at(
            secs(0.5),
            SimEvent::Beacon {
                receiver: 0,
                sender: 1,
                snapshot,
            },
        );

        let mut present_at_first_sweep = false;
        while let Some((now, event)) = queue.pop() {
            if now > secs(4.0) {
                break;
            }
            nodes.handle_event(&mut queue, event, now).unwrap();
            if now == secs(2.0) {
                // 1.5s old, still within max_age
                present_at_first_sweep = nodes.get(0).unwrap().table.contains(1);
            }
        }

        assert!(present_at_first_sweep);
        assert!(!nodes.get(0).unwrap().table.contains(1));
        let node = nodes.nodes.get_mut(&0).unwrap();
        assert_eq!(node.neighbor_count(secs(4.0)), 0);
        assert_eq!(node.density.borrow().total(), 0);
    }

    #[test]
    fn test_unknown_timer_is_fatal() {
        let mut queue = EventQueue::new();
        let mut nodes = nodes(&[0]);
        nodes.start_timers(&mut queue, SimTime::ZERO);
        let stray = queue.new_timer();

        let err = nodes
            .handle_event(&mut queue, SimEvent::Timer { node: 0, timer: stray }, secs(1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::Neighborhood(NeighborhoodError::UnknownTimer { owner_id: 0, .. })
        ));
    }

    #[test]
    fn test_beacon_for_unknown_node() {
        let mut nodes = nodes(&[0]);
        let snapshot = Snapshot::new(secs(0.5), secs(0.5), Coord::new(1.0, 1.0));
        assert!(matches!(
            nodes.deliver(5, 0, snapshot, secs(0.5)),
            Err(SimError::UnknownNode(5))
        ));
    }

    #[test]
    fn test_shutdown_cancels_timers() {
        let mut queue = EventQueue::new();
        let mut nodes = nodes(&[0, 1]);
        nodes.start_timers(&mut queue, SimTime::ZERO);
        assert_eq!(queue.len(), 2);

        nodes.shutdown(&mut queue);
        assert!(queue.pop().is_none());
    }
}
