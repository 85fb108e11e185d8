//! Mapping of positions onto the discrete cells of a density map.

use super::coord::Coord;
use crate::error::NeighborhoodError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub x: i32,
    pub y: i32,
}

impl CellId {
    /// Cell for positions that have no meaningful location (NaN or infinite).
    pub const SENTINEL: CellId = CellId {
        x: i32::MIN,
        y: i32::MIN,
    };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(f, "[sentinel]")
        } else {
            write!(f, "[{}, {}]", self.x, self.y)
        }
    }
}

/// Maps positions to cells. Implementations must be deterministic and total.
pub trait CellKeyProvider {
    fn cell_of(&self, position: &Coord) -> CellId;

    fn changed_cell(&self, a: &Coord, b: &Coord) -> bool {
        self.cell_of(a) != self.cell_of(b)
    }
}

/// Regular square grid over the x/y plane.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCellKeyProvider {
    origin: Coord,
    cell_size: f64,
    // (columns, rows); positions outside are clamped onto the border cells
    grid_size: Option<(u32, u32)>,
}

impl GridCellKeyProvider {
    pub fn new(origin: Coord, cell_size: f64) -> Result<Self, NeighborhoodError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(NeighborhoodError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            origin,
            cell_size,
            grid_size: None,
        })
    }

    pub fn with_grid_size(mut self, columns: u32, rows: u32) -> Self {
        // an empty grid would leave nothing to clamp onto
        let limit = i32::MAX as u32;
        self.grid_size = Some((columns.clamp(1, limit), rows.clamp(1, limit)));
        self
    }

    pub fn get_cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn get_grid_size(&self) -> Option<(u32, u32)> {
        self.grid_size
    }

    fn index(&self, value: f64, origin: f64, count: Option<u32>) -> i32 {
        // float to int casts saturate, so far away positions stay total
        let idx = ((value - origin) / self.cell_size).floor() as i32;
        match count {
            Some(count) => idx.clamp(0, count as i32 - 1),
            // keep clear of the sentinel
            None => idx.max(i32::MIN + 1),
        }
    }
}

impl CellKeyProvider for GridCellKeyProvider {
    fn cell_of(&self, position: &Coord) -> CellId {
        if !position.x.is_finite() || !position.y.is_finite() {
            return CellId::SENTINEL;
        }
        let (columns, rows) = match self.grid_size {
            Some((c, r)) => (Some(c), Some(r)),
            None => (None, None),
        };
        CellId {
            x: self.index(position.x, self.origin.x, columns),
            y: self.index(position.y, self.origin.y, rows),
        }
    }
}
