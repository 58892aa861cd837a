use std::hash::BuildHasherDefault;

use hashbrown::HashMap;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use ssc_core::{Color, TerrainId};

/// A terrain-classification-to-color table with a fallback for
/// classifications that have no configured color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    missing: Color,
    colors: HashMap<TerrainId, Color, BuildHasherDefault<FxHasher>>,
}

impl Palette {
    /// Creates an empty [`Palette`] with the provided fallback color.
    pub fn new(missing: Color) -> Self {
        Self {
            missing,
            colors: HashMap::default(),
        }
    }

    /// Adds a color for a terrain classification, returning the palette.
    pub fn with_color(mut self, id: TerrainId, color: Color) -> Self {
        self.colors.insert(id, color);
        self
    }

    /// The configured color of a classification, or `None` when absent.
    #[inline]
    pub fn color_of(&self, id: TerrainId) -> Option<Color> {
        self.colors.get(&id).copied()
    }

    /// The fallback color for classifications with no configured color.
    #[inline]
    pub fn missing(&self) -> Color {
        self.missing
    }

    /// Parses a [`Palette`] from its RON representation.
    pub fn from_ron_str(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }
}

/// The two named color-scheme variants a preview request may select from:
/// the curated default palette and the alternate, true-sampled one.
#[derive(Debug, Clone)]
pub struct ColorSchemes {
    /// The curated default palette.
    pub standard: Palette,
    /// The alternate palette, sampled from real terrain rendering.
    pub alternate: Palette,
}

impl ColorSchemes {
    /// Selects one of the two variants.
    #[inline]
    pub fn select(&self, alternate: bool) -> &Palette {
        if alternate {
            &self.alternate
        } else {
            &self.standard
        }
    }
}
