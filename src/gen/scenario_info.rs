use serde::Deserialize;

/// Parameters for generating a scenario. Times are seconds, lengths meters.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ScenarioInfo {
    pub node_num: u32,
    pub sim_time: f64,
    pub max_age: f64,
    pub cell_size: f64,
    pub area: Area,
    pub beacon_interval: f64,
    // beacons only reach nodes within this distance; everyone if absent
    pub range: Option<f64>,
    #[serde(default)]
    pub max_delay: f64,
    #[serde(default)]
    pub duplicate_rate: f64,
    pub mobility: Mobility,
    pub random_seed: Option<u64>,
}

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct Area {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize, PartialEq)]
pub enum Mobility {
    #[serde(rename = "static")]
    Static,
    #[serde(rename = "random_walk")]
    RandomWalk(RandomWalkMobility),
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RandomWalkMobility {
    pub speed: f64,
}

impl ScenarioInfo {
    pub fn check(&self) -> Result<(), String> {
        if !(self.beacon_interval > 0.0) {
            return Err(format!("beacon_interval must be positive, got {}", self.beacon_interval));
        }
        if !(self.max_age > 0.0) {
            return Err(format!("max_age must be positive, got {}", self.max_age));
        }
        if !(self.sim_time >= 0.0) {
            return Err(format!("sim_time must not be negative, got {}", self.sim_time));
        }
        if !(self.area.width >= 0.0 && self.area.height >= 0.0) {
            return Err(format!("invalid area {:?}", self.area));
        }
        if !(self.max_delay >= 0.0) {
            return Err(format!("max_delay must not be negative, got {}", self.max_delay));
        }
        if !(0.0..=1.0).contains(&self.duplicate_rate) {
            return Err(format!("duplicate_rate must be in [0, 1], got {}", self.duplicate_rate));
        }
        if let Mobility::RandomWalk(RandomWalkMobility { speed }) = self.mobility {
            if !(speed >= 0.0) {
                return Err(format!("speed must not be negative, got {speed}"));
            }
        }
        Ok(())
    }
}
