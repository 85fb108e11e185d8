use super::cell::CellKeyProvider;
use super::info::{BeaconReceptionInfo, Snapshot};
use super::listener::{dispatch, SharedListener};
use super::pool::{BeaconPool, InfoHandle};
use super::transition::{expiry, transition, Transition, TransitionEvent};
use super::NodeId;
use crate::error::NeighborhoodError;
use crate::time::{SimTime, TimerId};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// Live view of the neighbors one node has heard from within `max_age`.
///
/// Records are owned by a [`BeaconPool`]; the table only holds handles and
/// detaches them on expiry.
pub struct NeighborhoodTable {
    owner_id: NodeId,
    entries: HashMap<NodeId, InfoHandle>,
    max_age: SimTime,
    last_sweep: SimTime,
    last_updated_at: SimTime,
    ttl_timer: Option<TimerId>,
    cell_key_provider: Rc<dyn CellKeyProvider>,
    listeners: Vec<SharedListener>,
}

impl NeighborhoodTable {
    pub fn new(
        owner_id: NodeId,
        max_age: SimTime,
        cell_key_provider: Rc<dyn CellKeyProvider>,
    ) -> Result<Self, NeighborhoodError> {
        if !max_age.is_positive() {
            return Err(NeighborhoodError::InvalidMaxAge(max_age));
        }
        Ok(Self {
            owner_id,
            entries: HashMap::new(),
            max_age,
            last_sweep: SimTime::ZERO,
            last_updated_at: SimTime::ZERO,
            ttl_timer: None,
            cell_key_provider,
            listeners: Vec::new(),
        })
    }

    pub fn register_listener(&mut self, listener: SharedListener) {
        self.listeners.push(listener);
    }

    pub fn get_owner_id(&self) -> NodeId {
        self.owner_id
    }

    pub fn get_max_age(&self) -> SimTime {
        self.max_age
    }

    pub fn get_last_sweep(&self) -> SimTime {
        self.last_sweep
    }

    pub fn get_last_updated_at(&self) -> SimTime {
        self.last_updated_at
    }

    pub fn get_ttl_timer(&self) -> Option<TimerId> {
        self.ttl_timer
    }
}

// producer API
impl NeighborhoodTable {
    /// Accepts a beacon from `node_id`. Returns `None` when the snapshot is not
    /// newer than the stored one; such deliveries change nothing.
    pub fn process(
        &mut self,
        pool: &mut BeaconPool,
        node_id: NodeId,
        snapshot: Snapshot,
        now: SimTime,
    ) -> Option<Transition> {
        let handle = pool.get_or_create(node_id);
        if !pool.get_mut(handle).update(snapshot) {
            debug!(
                owner = self.owner_id,
                "out of order beacon ignored: {}",
                pool.get(handle).log_short()
            );
            return None;
        }
        self.process_info(pool, handle, now)
    }

    /// Runs the transition algorithm on a record the producer already updated
    /// through [`Self::get_for_update`].
    pub fn process_info(
        &mut self,
        pool: &mut BeaconPool,
        handle: InfoHandle,
        now: SimTime,
    ) -> Option<Transition> {
        let info = pool.get_mut(handle);
        debug!(owner = self.owner_id, "process_info {}", info.log_short());
        if !info.is_updated() {
            return None;
        }

        let node_id = info.get_node_id();
        if !self.entries.contains_key(&node_id) {
            // a detached node is no longer counted anywhere
            info.forget_prior();
        }
        info.touch_application_data(now);
        self.save_info(pool, handle, now);
        self.last_updated_at = now;

        let info = pool.get(handle);
        let expired = info.ttl_reached(now, self.max_age);
        let cell_changed = !expired && info.cell_changed(self.cell_key_provider.as_ref());
        let result = transition(info.has_prior(), expired, cell_changed);

        for event in result.events() {
            self.emit(*event, info);
        }
        if result.removes_entry() {
            self.detach(pool, node_id, now);
        }
        Some(result)
    }

    pub fn get_for_update(&self, pool: &mut BeaconPool, node_id: NodeId) -> InfoHandle {
        pool.get_or_create(node_id)
    }

    /// Attaches the record without evaluating it. Existing entries are left
    /// alone. Returns true if the record was added.
    pub fn save_info(&mut self, pool: &mut BeaconPool, handle: InfoHandle, now: SimTime) -> bool {
        let node_id = pool.get(handle).get_node_id();
        if self.entries.contains_key(&node_id) {
            return false;
        }
        self.entries.insert(node_id, handle);
        self.last_updated_at = now;
        self.notify_changed(now);
        true
    }

    /// Explicitly removes a neighbor, reporting it as `Removed`.
    pub fn remove_info(&mut self, pool: &mut BeaconPool, node_id: NodeId, now: SimTime) -> bool {
        let Some(handle) = self.entries.get(&node_id).copied() else {
            return false;
        };
        self.emit(TransitionEvent::Removed, pool.get(handle));
        self.detach(pool, node_id, now);
        true
    }
}

// lookup
impl NeighborhoodTable {
    pub fn find<'a>(&self, pool: &'a BeaconPool, node_id: NodeId) -> Option<&'a BeaconReceptionInfo> {
        self.entries.get(&node_id).map(|h| pool.get(*h))
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.entries.contains_key(&node_id)
    }

    /// Number of attached entries as of the last update, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Sweeps expired entries, then returns the remaining count.
    ///
    /// Unlike [`Self::len`] this mutates the table and may emit `Removed` or
    /// `Dropped` events.
    pub fn live_size(&mut self, pool: &mut BeaconPool, now: SimTime) -> usize {
        self.sweep(pool, now);
        self.entries.len()
    }
}

// ttl handling
impl NeighborhoodTable {
    /// Detaches every entry whose last reception is older than `max_age`.
    /// Returns the number of removed entries.
    pub fn sweep(&mut self, pool: &mut BeaconPool, now: SimTime) -> usize {
        let mut expired: Vec<(NodeId, InfoHandle)> = self
            .entries
            .iter()
            .filter(|(_, h)| pool.get(**h).ttl_reached(now, self.max_age))
            .map(|(id, h)| (*id, *h))
            .collect();
        // deterministic event order
        expired.sort_unstable_by_key(|(id, _)| *id);

        for (node_id, handle) in expired.iter() {
            let info = pool.get(*handle);
            self.emit(expiry(info.has_prior()), info);
            pool.get_mut(*handle).clear_application_data();
            self.entries.remove(node_id);
            self.last_updated_at = now;
        }

        trace!(
            owner = self.owner_id,
            removed = expired.len(),
            size = self.entries.len(),
            "ttl sweep at {now}"
        );
        self.last_sweep = now;
        self.notify_changed(now);
        expired.len()
    }

    /// Takes ownership of `timer` as the periodic TTL timer and returns the
    /// time of its first firing.
    pub fn start(&mut self, timer: TimerId, now: SimTime) -> SimTime {
        self.ttl_timer = Some(timer);
        now + self.max_age
    }

    /// Handles a fired timer. On the TTL timer this sweeps and returns the
    /// time at which it must fire again; any other timer is fatal.
    pub fn handle_timer(
        &mut self,
        pool: &mut BeaconPool,
        timer: TimerId,
        now: SimTime,
    ) -> Result<SimTime, NeighborhoodError> {
        if self.ttl_timer != Some(timer) {
            return Err(NeighborhoodError::UnknownTimer {
                owner_id: self.owner_id,
                timer,
                expected: self.ttl_timer,
            });
        }
        self.sweep(pool, now);
        Ok(now + self.max_age)
    }

    /// Releases the TTL timer. The caller must cancel the returned timer.
    pub fn shutdown(&mut self) -> Option<TimerId> {
        self.ttl_timer.take()
    }

    pub fn verify(&self, pool: &BeaconPool, now: SimTime) -> Result<(), NeighborhoodError> {
        for (node_id, handle) in self.entries.iter() {
            let info = pool.get(*handle);
            if info.ttl_reached(now, self.max_age) {
                return Err(NeighborhoodError::InvariantViolation {
                    owner_id: self.owner_id,
                    node_id: *node_id,
                    now,
                    received_time: info
                        .get_current()
                        .map(|s| s.received_time)
                        .unwrap_or_default(),
                    max_age: self.max_age,
                });
            }
        }
        Ok(())
    }
}

impl NeighborhoodTable {
    fn detach(&mut self, pool: &mut BeaconPool, node_id: NodeId, now: SimTime) {
        if let Some(handle) = self.entries.remove(&node_id) {
            // not owned here, only clear the payload
            pool.get_mut(handle).clear_application_data();
            self.last_updated_at = now;
            self.notify_changed(now);
        }
    }

    fn emit(&self, event: TransitionEvent, info: &BeaconReceptionInfo) {
        trace!(owner = self.owner_id, node = info.get_node_id(), ?event, "emit");
        for listener in self.listeners.iter() {
            dispatch(&mut *listener.borrow_mut(), event, info);
        }
    }

    fn notify_changed(&self, now: SimTime) {
        let size = self.entries.len();
        for listener in self.listeners.iter() {
            listener
                .borrow_mut()
                .on_table_changed(self.owner_id, size, now);
        }
    }
}
