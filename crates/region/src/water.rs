use bitflags::bitflags;
use glam::UVec2;
use ssc_core::Grid;

use crate::{CellIndices, FloodFiller};

bitflags! {
    /// The edges of a region that touch open water.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CoastEdges: u8 {
        const NORTH = 1 << 0;
        const SOUTH = 1 << 1;
        const WEST = 1 << 2;
        const EAST = 1 << 3;
    }
}

/// Water and coast information derived for a region.
///
/// Generation steps dereference this instead of consulting any global world
/// state, which keeps preview regions fully isolated.
#[derive(Debug)]
pub struct WaterInfo {
    coast_edges: CoastEdges,
    has_river: bool,
    shore_distance: Grid<u16>,
}

impl WaterInfo {
    /// Derives the water info for a region of the provided size.
    ///
    /// The shore-distance grid holds, for every cell, the orthogonal step
    /// distance to the nearest coastal edge (saturated to `u16::MAX` for
    /// landlocked regions). It is computed with a single breadth-first fill
    /// seeded from the coastal borders, so the result is deterministic for a
    /// given `(size, coast_edges)` pair.
    pub fn derive(
        size: UVec2,
        coast_edges: CoastEdges,
        has_river: bool,
        filler: &mut FloodFiller,
    ) -> Self {
        let indices = CellIndices::new(size);
        let mut shore_distance = Grid::<u16>::new(size);
        shore_distance.fill(u16::MAX);

        let mut seeds = Vec::new();
        if coast_edges.contains(CoastEdges::NORTH) {
            seeds.extend(0..size.x);
        }
        if coast_edges.contains(CoastEdges::SOUTH) {
            seeds.extend((0..size.x).map(|x| (size.y - 1) * size.x + x));
        }
        if coast_edges.contains(CoastEdges::WEST) {
            seeds.extend((0..size.y).map(|y| y * size.x));
        }
        if coast_edges.contains(CoastEdges::EAST) {
            seeds.extend((0..size.y).map(|y| y * size.x + size.x - 1));
        }

        filler.flood(
            &indices,
            seeds,
            |_| true,
            |index, distance| {
                let cell = indices.cell_of(index).unwrap_or_default();
                shore_distance.set(cell.x, cell.y, distance.min(u16::MAX as u32) as u16);
            },
        );

        Self {
            coast_edges,
            has_river,
            shore_distance,
        }
    }

    /// The edges of the region that touch open water.
    #[inline]
    pub fn coast_edges(&self) -> CoastEdges {
        self.coast_edges
    }

    /// Whether a river crosses the region.
    #[inline]
    pub fn has_river(&self) -> bool {
        self.has_river
    }

    /// The distance from `(x, y)` to the nearest coastal edge, in orthogonal
    /// steps, or `u16::MAX` when the region is landlocked.
    #[inline]
    pub fn shore_distance(&self, x: u32, y: u32) -> u16 {
        self.shore_distance.get(x, y)
    }
}
