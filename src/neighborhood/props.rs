use super::{BeaconPool, CellKeyProvider, Coord, GridCellKeyProvider, NeighborhoodTable, NodeId, Snapshot};
use crate::sim::density::DensityCounter;
use crate::time::SimTime;
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// (sender, created ms, delay ms, cell x, cell y)
type Delivery = (NodeId, i64, i64, i32, i32);

fn ms(ms: i64) -> SimTime {
    SimTime::from_nanos(ms * 1_000_000)
}

fn deliveries() -> impl Strategy<Value = Vec<Delivery>> {
    prop::collection::vec((0u32..6, 0i64..10_000, 0i64..2_000, 0i32..4, 0i32..4), 0..80)
}

// replays deliveries in arrival order
struct Replay {
    table: NeighborhoodTable,
    pool: BeaconPool,
    density: Rc<RefCell<DensityCounter>>,
    // sender -> (created, received) of the newest accepted beacon
    accepted: HashMap<NodeId, (SimTime, SimTime)>,
    last_time: SimTime,
}

impl Replay {
    fn new(max_age_ms: i64) -> Self {
        let grid: Rc<dyn CellKeyProvider> =
            Rc::new(GridCellKeyProvider::new(Coord::default(), 10.0).unwrap());
        let density = Rc::new(RefCell::new(DensityCounter::new(grid.clone())));
        let mut table = NeighborhoodTable::new(100, ms(max_age_ms), grid).unwrap();
        table.register_listener(density.clone());
        Self {
            table,
            pool: BeaconPool::new(),
            density,
            accepted: HashMap::new(),
            last_time: SimTime::ZERO,
        }
    }

    fn run(&mut self, mut deliveries: Vec<Delivery>) -> Result<(), TestCaseError> {
        deliveries.sort_by_key(|(_, created, delay, _, _)| created + delay);
        for (sender, created, delay, cx, cy) in deliveries {
            let (created, received) = (ms(created), ms(created + delay));
            let position = Coord::new(cx as f64 * 10.0 + 5.0, cy as f64 * 10.0 + 5.0);
            let snapshot = Snapshot::new(created, received, position);

            let newer = match self.accepted.get(&sender) {
                Some((last, _)) => created > *last,
                None => true,
            };
            let result = self.table.process(&mut self.pool, sender, snapshot, received);
            prop_assert_eq!(result.is_some(), newer);
            if newer {
                self.accepted.insert(sender, (created, received));
            }
            self.last_time = received;
        }
        Ok(())
    }
}

proptest! {
    #[test]
    fn prop_ttl_sweep_leaves_only_fresh_entries(
        deliveries in deliveries(),
        max_age_ms in 1i64..3_000,
        tail_ms in 0i64..5_000,
    ) {
        let mut replay = Replay::new(max_age_ms);
        replay.run(deliveries)?;
        let now = replay.last_time + ms(tail_ms);

        replay.table.sweep(&mut replay.pool, now);
        prop_assert!(replay.table.verify(&replay.pool, now).is_ok());
        for id in replay.table.node_ids() {
            let info = replay.table.find(&replay.pool, id).unwrap();
            prop_assert!(!info.ttl_reached(now, ms(max_age_ms)));
        }
    }

    #[test]
    fn prop_accepted_creation_times_strictly_increase(
        deliveries in deliveries(),
        max_age_ms in 1i64..3_000,
    ) {
        let mut replay = Replay::new(max_age_ms);
        replay.run(deliveries)?;
        for (sender, (created, _)) in replay.accepted.iter() {
            let current = replay.pool.find(*sender).and_then(|i| i.get_current()).unwrap();
            prop_assert_eq!(current.creation_time, *created);
        }
    }

    #[test]
    fn prop_live_size_counts_fresh_senders(
        deliveries in deliveries(),
        max_age_ms in 1i64..3_000,
        tail_ms in 0i64..5_000,
    ) {
        let mut replay = Replay::new(max_age_ms);
        replay.run(deliveries)?;
        let now = replay.last_time + ms(tail_ms);

        let fresh = replay
            .accepted
            .values()
            .filter(|(_, received)| now - *received <= ms(max_age_ms))
            .count();
        prop_assert_eq!(replay.table.live_size(&mut replay.pool, now), fresh);
    }

    #[test]
    fn prop_density_matches_table(
        deliveries in deliveries(),
        max_age_ms in 1i64..3_000,
        tail_ms in 0i64..5_000,
    ) {
        let mut replay = Replay::new(max_age_ms);
        replay.run(deliveries)?;
        let now = replay.last_time + ms(tail_ms);
        let size = replay.table.live_size(&mut replay.pool, now);

        let density = replay.density.borrow();
        prop_assert_eq!(density.total() as usize, size);
        prop_assert_eq!(density.get_underflows(), 0);
        for id in replay.table.node_ids() {
            prop_assert!(density.is_counted(id));
        }
    }
}
