use super::info::BeaconReceptionInfo;
use super::NodeId;
use std::collections::HashMap;

/// Index of a record inside a [`BeaconPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHandle(usize);

/// Owner of all reception records of one node.
///
/// Records are created on first sighting and never freed; tables only keep
/// handles into the pool, so detaching an entry can not invalidate a record.
#[derive(Debug, Default)]
pub struct BeaconPool {
    infos: Vec<BeaconReceptionInfo>,
    by_node: HashMap<NodeId, InfoHandle>,
}

impl BeaconPool {
    pub fn new() -> Self {
        Self {
            infos: Vec::new(),
            by_node: HashMap::new(),
        }
    }

    pub fn get_or_create(&mut self, node_id: NodeId) -> InfoHandle {
        if let Some(handle) = self.by_node.get(&node_id) {
            return *handle;
        }
        let handle = InfoHandle(self.infos.len());
        self.infos.push(BeaconReceptionInfo::new(node_id));
        self.by_node.insert(node_id, handle);
        handle
    }

    pub fn handle_of(&self, node_id: NodeId) -> Option<InfoHandle> {
        self.by_node.get(&node_id).copied()
    }

    pub fn get(&self, handle: InfoHandle) -> &BeaconReceptionInfo {
        // handles are only minted by this pool and records are never removed
        &self.infos[handle.0]
    }

    pub fn get_mut(&mut self, handle: InfoHandle) -> &mut BeaconReceptionInfo {
        &mut self.infos[handle.0]
    }

    pub fn find(&self, node_id: NodeId) -> Option<&BeaconReceptionInfo> {
        self.handle_of(node_id).map(|h| self.get(h))
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}
