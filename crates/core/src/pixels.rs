use glam::UVec2;

use crate::Color;

/// A flat, row-major color buffer addressable by `(x, y)`.
///
/// The buffer is a plain CPU-side allocation, decoupled from any GPU-resident
/// texture, so it is safe to fill from a background thread. The only point at
/// which its contents should cross into a rendering context is [`copy_to`],
/// which the consumer must call on whatever thread its rendering API
/// requires.
///
/// [`copy_to`]: PixelBuffer::copy_to
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    size: UVec2,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Creates a new [`PixelBuffer`] of the provided size, filled with
    /// transparent pixels.
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            pixels: vec![Color::TRANSPARENT; size.x as usize * size.y as usize],
        }
    }

    /// Creates a [`PixelBuffer`] of the provided size, reusing the allocation
    /// of `existing` when possible.
    ///
    /// The contents of the returned buffer are unspecified; callers are
    /// expected to overwrite every pixel they intend to read back.
    pub fn recycled(existing: PixelBuffer, size: UVec2) -> Self {
        let len = size.x as usize * size.y as usize;
        let mut pixels = existing.pixels;
        pixels.resize(len, Color::TRANSPARENT);
        Self { size, pixels }
    }

    /// The dimensions of the buffer.
    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Returns the color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        assert!(x < self.size.x && y < self.size.y, "pixel out of bounds");
        self.pixels[(y * self.size.x + x) as usize]
    }

    /// Sets the color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        assert!(x < self.size.x && y < self.size.y, "pixel out of bounds");
        self.pixels[(y * self.size.x + x) as usize] = color;
    }

    /// Performs a bulk, order-preserving copy of the whole buffer into a
    /// caller-owned slice.
    ///
    /// # Panics
    ///
    /// Panics if `destination` is not exactly as long as the buffer.
    pub fn copy_to(&self, destination: &mut [Color]) {
        assert_eq!(
            destination.len(),
            self.pixels.len(),
            "destination size mismatch",
        );
        destination.copy_from_slice(&self.pixels);
    }

    /// The backing row-major pixel slice.
    #[inline]
    pub fn as_colors(&self) -> &[Color] {
        &self.pixels
    }

    /// Consumes the buffer, returning the backing pixel storage.
    #[inline]
    pub fn into_colors(self) -> Vec<Color> {
        self.pixels
    }
}
