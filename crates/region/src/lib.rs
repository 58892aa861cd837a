//! The isolated region stub used by preview generation jobs.
//!
//! A [`Region`] is a minimal, non-persistent stand-in for a real simulation
//! region: it carries just the fields generation steps read (dimensions, the
//! owning location, and a few derived lookup structures) and is registered in
//! no global registry whatsoever. Dropping the handle is the only cleanup it
//! ever needs.

use glam::UVec2;
use parking_lot::Mutex;

mod indices;
pub use indices::*;

mod flood;
pub use flood::*;

mod water;
pub use water::*;

/// Per-location metadata supplied by the world context provider.
///
/// This is the only piece of world state a preview region is built from.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationInfo {
    /// The edges of the location that touch open water.
    pub coast_edges: CoastEdges,
    /// Whether a river crosses the location.
    pub has_river: bool,
}

/// A throwaway simulation region, built just well enough to satisfy the data
/// dependencies of generation steps.
#[derive(Debug)]
pub struct Region {
    size: UVec2,
    location_id: u32,
    indices: CellIndices,
    water: WaterInfo,
    // The fill scratch is reused across the fills a job runs; the lock keeps
    // the shared `Arc<Region>` handle `Sync` for post-run introspection.
    flood: Mutex<FloodFiller>,
}

impl Region {
    /// Builds a new isolated [`Region`].
    ///
    /// The derived lookup structures (cell indexing, flood-fill scratch,
    /// water/coast info) are computed here, deterministically from
    /// `(size, location)`.
    pub fn build(size: UVec2, location_id: u32, location: &LocationInfo) -> Self {
        let mut filler = FloodFiller::new();
        let water = WaterInfo::derive(size, location.coast_edges, location.has_river, &mut filler);

        Self {
            size,
            location_id,
            indices: CellIndices::new(size),
            water,
            flood: Mutex::new(filler),
        }
    }

    /// The dimensions of the region.
    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// The identifier of the location this region previews.
    #[inline]
    pub fn location_id(&self) -> u32 {
        self.location_id
    }

    /// The cell indexing structure of the region.
    #[inline]
    pub fn indices(&self) -> &CellIndices {
        &self.indices
    }

    /// The water and coast information of the region.
    #[inline]
    pub fn water(&self) -> &WaterInfo {
        &self.water
    }

    /// Runs a breadth-first flood fill over the region's cells, reusing the
    /// region's fill scratch.
    ///
    /// See [`FloodFiller::flood`] for the exact semantics.
    pub fn flood_fill(
        &self,
        seeds: impl IntoIterator<Item = u32>,
        passable: impl FnMut(u32) -> bool,
        visit: impl FnMut(u32, u32),
    ) {
        self.flood.lock().flood(&self.indices, seeds, passable, visit);
    }
}
