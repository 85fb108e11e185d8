use crate::file::InputFile;
use crate::utils;
use std::error;
use std::path::PathBuf;
use tracing::info;

use self::scenario_info::ScenarioInfo;
use self::walk::generate_scenario;

pub mod scenario_info;
pub mod walk;

#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub scenario_info: ScenarioInfo,
    pub scenario: Option<InputFile>,
}

impl Config {
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Result<Self, Box<dyn error::Error>> {
        let scenario_info: ScenarioInfo = utils::read_json(input_path)?;
        Ok(Config {
            path: output_path,
            scenario_info,
            scenario: None,
        })
    }

    pub fn build(&mut self) -> Result<(), Box<dyn error::Error>> {
        self.scenario_info.check()?;
        let scenario = generate_scenario(&self.scenario_info);
        info!(
            nodes = scenario.nodes.len(),
            beacons = scenario.beacons.len(),
            "scenario generated"
        );
        self.scenario = Some(scenario);
        Ok(())
    }

    pub fn generate(&self) -> Result<(), Box<dyn error::Error>> {
        let scenario = self
            .scenario
            .as_ref()
            .ok_or("scenario not built, call build() first")?;
        utils::write_json(&self.path, scenario)
    }
}
