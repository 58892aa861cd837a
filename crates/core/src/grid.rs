use glam::UVec2;

/// A flat, row-major 2D grid of values.
///
/// Used for the intermediate per-cell grids produced by generation steps
/// (elevation, fertility, cave-ness) as well as for scratch masks.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    size: UVec2,
    data: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Creates a new [`Grid`] filled with the default value of `T`.
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            data: vec![T::default(); size.x as usize * size.y as usize],
        }
    }

    /// The dimensions of the grid.
    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Returns whether `(x, y)` lies within the grid.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.size.x && y < self.size.y
    }

    /// Returns the value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        assert!(self.contains(x, y), "grid access out of bounds");
        self.data[(y * self.size.x + x) as usize]
    }

    /// Returns the value at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get_checked(&self, x: u32, y: u32) -> Option<T> {
        self.contains(x, y)
            .then(|| self.data[(y * self.size.x + x) as usize])
    }

    /// Sets the value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        assert!(self.contains(x, y), "grid access out of bounds");
        self.data[(y * self.size.x + x) as usize] = value;
    }

    /// Fills the whole grid with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// The backing row-major slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
