use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A color, represented as four 8-bit unsigned channels.
///
/// The layout is plain `RGBA`, one byte per channel, making a pixel buffer of
/// [`Color`]s directly uploadable to whatever texture resource the consumer
/// uses.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Zeroable, Pod, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// (0, 0, 0, 255)
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// (255, 255, 255, 255)
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// (255, 0, 0, 255)
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// (255, 0, 255, 255)
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    /// (0, 0, 0, 0)
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Creates a new [`Color`] from its RGB components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Creates a new [`Color`] from its RGBA components.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Changes the alpha component of the [`Color`], returning a new one.
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::rgba(self.r, self.g, self.b, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        let c = Color::rgb(1, 2, 3);
        assert_eq!(c, Color::rgba(1, 2, 3, 255));
        assert_eq!(c.with_alpha(7).a, 7);
    }

    #[test]
    fn pod_layout_is_rgba() {
        let c = Color::rgba(1, 2, 3, 4);
        assert_eq!(bytemuck::bytes_of(&c), &[1, 2, 3, 4]);
    }
}
