pub mod density;
pub mod node;
pub mod nodes;
pub mod scheduler;

use self::node::Node;
use self::nodes::Nodes;
use self::scheduler::{EventQueue, SimEvent};
use crate::error::SimError;
use crate::file::InputFile;
use crate::log::EventLog;
use crate::neighborhood::{CellKeyProvider, GridCellKeyProvider};
use crate::time::SimTime;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::{error, path::PathBuf};
use tracing::info;

pub struct SimBuilder {
    pub path: PathBuf,
}

impl SimBuilder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn build(&self) -> Result<Sim, Box<dyn error::Error>> {
        let input = InputFile::new(&self.path)?;
        Ok(Sim::from_input(&input)?)
    }
}

pub struct Sim {
    pub sim_time: SimTime,
    pub cur_time: SimTime,
    pub nodes: Nodes,
    pub queue: EventQueue,
    pub log: Rc<RefCell<EventLog>>,
}

impl Sim {
    pub fn from_input(input: &InputFile) -> Result<Self, SimError> {
        input.validate()?;

        let mut grid = GridCellKeyProvider::new(input.grid_origin, input.cell_size)?;
        if let Some((columns, rows)) = input.grid_size {
            grid = grid.with_grid_size(columns, rows);
        }
        let grid: Rc<dyn CellKeyProvider> = Rc::new(grid);
        let log = Rc::new(RefCell::new(EventLog::new()));

        let mut nodes = Vec::with_capacity(input.nodes.len());
        for id in input.nodes.iter() {
            let mut node = Node::new(*id, input.max_age, grid.clone())?;
            node.register_listener(log.clone());
            nodes.push(node);
        }

        let mut queue = EventQueue::new();
        let mut nodes = Nodes::new(nodes);
        nodes.start_timers(&mut queue, SimTime::ZERO);

        for beacon in input.beacons.iter() {
            queue.schedule_at(
                beacon.received_time,
                SimEvent::Beacon {
                    receiver: beacon.receiver,
                    sender: beacon.sender,
                    snapshot: beacon.snapshot(),
                },
            );
        }

        Ok(Sim {
            sim_time: input.sim_time,
            cur_time: SimTime::ZERO,
            nodes,
            queue,
            log,
        })
    }

    pub fn run(&mut self) -> Result<(), SimError> {
        info!(
            nodes = self.nodes.len(),
            events = self.queue.len(),
            "simulation start, end at {}",
            self.sim_time
        );

        while let Some(time) = self.queue.peek_time() {
            if time > self.sim_time {
                break;
            }
            let Some((now, event)) = self.queue.pop() else {
                break;
            };
            self.cur_time = now;
            self.nodes.handle_event(&mut self.queue, event, now)?;
        }

        self.cur_time = self.sim_time;
        self.nodes.shutdown(&mut self.queue);
        info!("simulation finished at {}", self.cur_time);
        Ok(())
    }

    pub fn summary(&mut self) -> BTreeMap<String, f64> {
        let now = self.cur_time;
        let mut neighbors = 0;
        let mut density_total = 0;
        let mut underflows = 0;
        for node in self.nodes.nodes.values_mut() {
            neighbors += node.neighbor_count(now);
            let density = node.density.borrow();
            density_total += density.total();
            underflows += density.get_underflows();
        }

        let mut result = self
            .log
            .borrow()
            .aggregate(SimTime::ZERO, now + SimTime::from_nanos(1));
        result.insert("nodes".to_string(), self.nodes.len() as f64);
        result.insert("final_neighbors".to_string(), neighbors as f64);
        result.insert("final_density_total".to_string(), density_total as f64);
        result.insert("density_underflows".to_string(), underflows as f64);
        result
    }
}
