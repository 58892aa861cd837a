use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Identifies a terrain classification within the consumer's terrain
/// registry.
///
/// The preview core never interprets the identifier itself; it only uses it
/// to look up colors in a palette supplied by the same collaborator that
/// provides the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerrainId(pub u32);

bitflags! {
    /// Properties of a terrain classification that the preview pipeline
    /// needs to branch on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TerrainFlags: u8 {
        /// The terrain is a river. River cells are exempt from the
        /// high-elevation solid-rock rule.
        const RIVER = 1 << 0;
        /// The terrain is standing water.
        const WATER = 1 << 1;
    }
}

/// The classification of a single map cell, as resolved by the external
/// terrain classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainKind {
    /// The identifier of the classification.
    pub id: TerrainId,
    /// The properties of the classification.
    pub flags: TerrainFlags,
}

impl TerrainKind {
    /// Creates a [`TerrainKind`] with no special properties.
    #[inline]
    pub const fn plain(id: TerrainId) -> Self {
        Self {
            id,
            flags: TerrainFlags::empty(),
        }
    }

    /// Returns whether this classification is a river.
    #[inline]
    pub fn is_river(&self) -> bool {
        self.flags.contains(TerrainFlags::RIVER)
    }
}
