use glam::UVec2;

/// Row-major `(x, y) <-> index` mapping for the cells of a region.
#[derive(Debug, Clone, Copy)]
pub struct CellIndices {
    size: UVec2,
}

impl CellIndices {
    /// Creates a new [`CellIndices`] for a region of the provided size.
    #[inline]
    pub fn new(size: UVec2) -> Self {
        Self { size }
    }

    /// The dimensions of the indexed region.
    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// The total number of cells.
    #[inline]
    pub fn cell_count(&self) -> u32 {
        self.size.x * self.size.y
    }

    /// Returns whether `(x, y)` lies within the region.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.size.x && y < self.size.y
    }

    /// Returns the flat index of `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> Option<u32> {
        self.contains(x, y).then(|| y * self.size.x + x)
    }

    /// Returns the cell position of a flat index, or `None` when out of
    /// bounds.
    #[inline]
    pub fn cell_of(&self, index: u32) -> Option<UVec2> {
        (index < self.cell_count())
            .then(|| UVec2::new(index % self.size.x, index / self.size.x))
    }

    /// Calls `f` with the flat index of every in-bounds orthogonal neighbor
    /// of `index`.
    pub fn for_each_neighbor(&self, index: u32, mut f: impl FnMut(u32)) {
        let Some(cell) = self.cell_of(index) else {
            return;
        };

        if cell.x > 0 {
            f(index - 1);
        }
        if cell.x + 1 < self.size.x {
            f(index + 1);
        }
        if cell.y > 0 {
            f(index - self.size.x);
        }
        if cell.y + 1 < self.size.y {
            f(index + self.size.x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_positions_and_indices() {
        let idx = CellIndices::new(UVec2::new(4, 2));
        assert_eq!(idx.cell_count(), 8);
        assert_eq!(idx.index_of(0, 0), Some(0));
        assert_eq!(idx.index_of(3, 0), Some(3));
        assert_eq!(idx.index_of(0, 1), Some(4));
        assert_eq!(idx.index_of(4, 0), None);
        assert_eq!(idx.cell_of(5), Some(UVec2::new(1, 1)));
        assert_eq!(idx.cell_of(8), None);
    }

    #[test]
    fn neighbors_respect_bounds() {
        let idx = CellIndices::new(UVec2::new(3, 3));
        let mut seen = Vec::new();
        idx.for_each_neighbor(0, |n| seen.push(n));
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 3]);

        seen.clear();
        idx.for_each_neighbor(4, |n| seen.push(n));
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 3, 5, 7]);
    }
}
