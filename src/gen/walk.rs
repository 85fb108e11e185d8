use super::scenario_info::{Area, Mobility, RandomWalkMobility, ScenarioInfo};
use crate::file::{BeaconInfo, InputFile};
use crate::neighborhood::{Coord, NodeId};
use crate::time::SimTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

pub fn generate_scenario(info: &ScenarioInfo) -> InputFile {
    let mut rng = match info.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let nodes: Vec<NodeId> = (0..info.node_num).collect();
    let mut positions: Vec<Coord> = nodes
        .iter()
        .map(|_| random_position(&mut rng, &info.area))
        .collect();

    let mut beacons = Vec::new();
    let steps = (info.sim_time / info.beacon_interval).floor() as u64;

    for step in 0..=steps {
        let t = step as f64 * info.beacon_interval;
        if step > 0 {
            for position in positions.iter_mut() {
                *position = next_position(&mut rng, *position, &info.mobility, info);
            }
        }

        for sender in nodes.iter() {
            let position = positions[*sender as usize];
            for receiver in nodes.iter() {
                if receiver == sender {
                    continue;
                }
                if let Some(range) = info.range {
                    if position.distance(&positions[*receiver as usize]) > range {
                        continue;
                    }
                }
                beacons.push(beacon(&mut rng, *receiver, *sender, t, position, info.max_delay));
                if info.duplicate_rate > 0.0 && rng.gen_bool(info.duplicate_rate) {
                    beacons.push(beacon(&mut rng, *receiver, *sender, t, position, info.max_delay));
                }
            }
        }
    }

    InputFile {
        max_age: SimTime::from_secs_f64(info.max_age),
        sim_time: SimTime::from_secs_f64(info.sim_time),
        cell_size: info.cell_size,
        grid_origin: Coord::default(),
        grid_size: None,
        nodes,
        beacons,
    }
}

fn random_position(rng: &mut StdRng, area: &Area) -> Coord {
    Coord::new(rng.gen_range(0.0..=area.width), rng.gen_range(0.0..=area.height))
}

fn next_position(rng: &mut StdRng, position: Coord, mobility: &Mobility, info: &ScenarioInfo) -> Coord {
    match mobility {
        Mobility::Static => position,
        Mobility::RandomWalk(RandomWalkMobility { speed }) => {
            let heading = rng.gen_range(0.0..TAU);
            let step = speed * info.beacon_interval;
            Coord::new(
                (position.x + step * heading.cos()).clamp(0.0, info.area.width),
                (position.y + step * heading.sin()).clamp(0.0, info.area.height),
            )
        }
    }
}

fn beacon(
    rng: &mut StdRng,
    receiver: NodeId,
    sender: NodeId,
    t: f64,
    position: Coord,
    max_delay: f64,
) -> BeaconInfo {
    let delay = rng.gen_range(0.0..=max_delay);
    BeaconInfo {
        receiver,
        sender,
        creation_time: SimTime::from_secs_f64(t),
        received_time: SimTime::from_secs_f64(t + delay),
        position,
        position_uncertainty: Coord::default(),
    }
}
