use super::cell::CellKeyProvider;
use super::coord::Coord;
use super::NodeId;
use crate::time::SimTime;
use serde::{Deserialize, Serialize};

/// One observed beacon transmission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub creation_time: SimTime,
    pub received_time: SimTime,
    pub position: Coord,
    #[serde(default)]
    pub position_uncertainty: Coord,
}

impl Snapshot {
    pub fn new(creation_time: SimTime, received_time: SimTime, position: Coord) -> Self {
        Self {
            creation_time,
            received_time,
            position,
            position_uncertainty: Coord::default(),
        }
    }

    pub fn with_uncertainty(mut self, uncertainty: Coord) -> Self {
        self.position_uncertainty = uncertainty;
        self
    }

    pub fn age(&self, now: SimTime) -> SimTime {
        now - self.received_time
    }
}

/// Mutable payload that only lives while the record is in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationData {
    pub first_received: SimTime,
    pub beacon_count: u32,
}

/// Reception state of a single neighbor.
///
/// `prior` holds the snapshot that was `current` before the last accepted
/// update. A record without `prior` has never been counted in any cell.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconReceptionInfo {
    node_id: NodeId,
    current: Option<Snapshot>,
    prior: Option<Snapshot>,
    updated: bool,
    app_data: Option<ApplicationData>,
}

impl BeaconReceptionInfo {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            current: None,
            prior: None,
            updated: false,
            app_data: None,
        }
    }

    /// Stores `snapshot` if it was created strictly after the current one.
    /// Returns the new value of the `updated` flag.
    pub fn update(&mut self, snapshot: Snapshot) -> bool {
        if let Some(current) = &self.current {
            if snapshot.creation_time <= current.creation_time {
                // out of order or duplicate
                self.updated = false;
                return false;
            }
        }
        self.prior = self.current.replace(snapshot);
        self.updated = true;
        true
    }

    /// Drops the cell history so the next evaluation treats the node as a
    /// first sighting.
    pub(crate) fn forget_prior(&mut self) {
        self.prior = None;
    }

    pub fn get_node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn get_current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn get_prior(&self) -> Option<&Snapshot> {
        self.prior.as_ref()
    }

    pub fn is_updated(&self) -> bool {
        self.updated
    }

    pub fn has_prior(&self) -> bool {
        self.prior.is_some()
    }

    /// An empty record has nothing to keep alive and counts as expired.
    pub fn ttl_reached(&self, now: SimTime, max_age: SimTime) -> bool {
        match &self.current {
            Some(current) => current.age(now) > max_age,
            None => true,
        }
    }

    /// True if current and prior snapshot fall into different cells.
    /// Without a prior snapshot there is no cell to leave.
    pub fn cell_changed(&self, provider: &dyn CellKeyProvider) -> bool {
        match (&self.current, &self.prior) {
            (Some(current), Some(prior)) => provider.changed_cell(&current.position, &prior.position),
            _ => false,
        }
    }

    pub fn get_application_data(&self) -> Option<&ApplicationData> {
        self.app_data.as_ref()
    }

    pub(crate) fn touch_application_data(&mut self, now: SimTime) {
        match &mut self.app_data {
            Some(data) => data.beacon_count += 1,
            None => {
                self.app_data = Some(ApplicationData {
                    first_received: now,
                    beacon_count: 1,
                })
            }
        }
    }

    pub fn clear_application_data(&mut self) {
        self.app_data = None;
    }

    pub fn log_short(&self) -> String {
        let fmt_snapshot = |s: Option<&Snapshot>| match s {
            Some(s) => format!("{}@{}/{}", s.position, s.creation_time, s.received_time),
            None => "-".to_string(),
        };
        format!(
            "id={} updated={} current={} prior={}",
            self.node_id,
            self.updated,
            fmt_snapshot(self.current.as_ref()),
            fmt_snapshot(self.prior.as_ref())
        )
    }
}
