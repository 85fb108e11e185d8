use crate::error::SimError;
use crate::neighborhood::{Coord, NodeId, Snapshot};
use crate::time::SimTime;
use crate::utils::read_json;
use serde::{Deserialize, Serialize};
use std::error;
use std::path::Path;
use tracing::warn;

/// Scenario consumed by `run`. All times are seconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InputFile {
    pub max_age: SimTime,
    pub sim_time: SimTime,
    pub cell_size: f64,
    #[serde(default)]
    pub grid_origin: Coord,
    #[serde(default)]
    pub grid_size: Option<(u32, u32)>,
    pub nodes: Vec<NodeId>,
    pub beacons: Vec<BeaconInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BeaconInfo {
    pub receiver: NodeId,
    pub sender: NodeId,
    pub creation_time: SimTime,
    pub received_time: SimTime,
    pub position: Coord,
    #[serde(default)]
    pub position_uncertainty: Coord,
}

impl BeaconInfo {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.creation_time, self.received_time, self.position)
            .with_uncertainty(self.position_uncertainty)
    }
}

impl InputFile {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, Box<dyn error::Error>> {
        let input: InputFile = read_json(path)?;
        input.validate()?;
        let strangers = input
            .beacons
            .iter()
            .filter(|b| !input.nodes.contains(&b.sender))
            .count();
        if strangers > 0 {
            warn!("{strangers} beacons come from senders outside the node list");
        }
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for beacon in self.beacons.iter() {
            if !self.nodes.contains(&beacon.receiver) {
                return Err(SimError::UnknownNode(beacon.receiver));
            }
            if beacon.received_time < beacon.creation_time {
                return Err(SimError::ReceivedBeforeCreation {
                    sender: beacon.sender,
                    receiver: beacon.receiver,
                    creation_time: beacon.creation_time,
                    received_time: beacon.received_time,
                });
            }
        }
        Ok(())
    }
}
