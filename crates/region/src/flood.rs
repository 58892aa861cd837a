use std::collections::VecDeque;

use crate::CellIndices;

/// A reusable breadth-first flood-fill helper.
///
/// Generation steps and the region's own derived structures run several
/// fills per job; the scratch storage is kept between calls so repeated
/// fills over the same region do not reallocate.
#[derive(Debug, Default)]
pub struct FloodFiller {
    visited: Vec<bool>,
    queue: VecDeque<(u32, u32)>,
}

impl FloodFiller {
    /// Creates a new, empty [`FloodFiller`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a breadth-first fill over `indices`.
    ///
    /// The fill starts from every seed cell satisfying `passable` and visits
    /// each reachable passable cell exactly once, calling
    /// `visit(index, distance)` with the orthogonal step distance from the
    /// nearest seed. Visit order between cells of equal distance follows the
    /// seed/neighbor enumeration order, so fills are fully deterministic.
    pub fn flood(
        &mut self,
        indices: &CellIndices,
        seeds: impl IntoIterator<Item = u32>,
        mut passable: impl FnMut(u32) -> bool,
        mut visit: impl FnMut(u32, u32),
    ) {
        self.visited.clear();
        self.visited.resize(indices.cell_count() as usize, false);
        self.queue.clear();

        for seed in seeds {
            if seed < indices.cell_count() && !self.visited[seed as usize] && passable(seed) {
                self.visited[seed as usize] = true;
                self.queue.push_back((seed, 0));
                visit(seed, 0);
            }
        }

        while let Some((index, distance)) = self.queue.pop_front() {
            // A cell has at most four orthogonal neighbors.
            let mut next = [0u32; 4];
            let mut count = 0;
            indices.for_each_neighbor(index, |neighbor| {
                next[count] = neighbor;
                count += 1;
            });

            for &neighbor in &next[..count] {
                if !self.visited[neighbor as usize] && passable(neighbor) {
                    self.visited[neighbor as usize] = true;
                    visit(neighbor, distance + 1);
                    self.queue.push_back((neighbor, distance + 1));
                }
            }
        }
    }
}
