//! Per-node registry of neighbor beacons with TTL expiry and cell-occupancy
//! transition events.

pub mod cell;
pub mod coord;
pub mod info;
pub mod listener;
pub mod pool;
pub mod table;
pub mod transition;

#[cfg(test)]
mod props;

pub use self::cell::{CellId, CellKeyProvider, GridCellKeyProvider};
pub use self::coord::Coord;
pub use self::info::{ApplicationData, BeaconReceptionInfo, Snapshot};
pub use self::listener::{NeighborhoodEntryListener, SharedListener};
pub use self::pool::{BeaconPool, InfoHandle};
pub use self::table::NeighborhoodTable;
pub use self::transition::{transition, Transition, TransitionEvent};

pub type NodeId = u32;
