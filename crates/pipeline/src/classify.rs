use ssc_core::TerrainKind;
use ssc_region::Region;

/// An error returned when a cell's terrain classification cannot be
/// resolved.
///
/// This is a partial-generation error: the pipeline paints the cell with a
/// distinguishable error color, records it, and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unresolved terrain classification at ({x}, {y})")]
pub struct ClassifyError {
    /// The X coordinate of the offending cell.
    pub x: u32,
    /// The Y coordinate of the offending cell.
    pub y: u32,
}

/// The external terrain classification collaborator.
///
/// Implementations hold the real generation logic; the preview pipeline only
/// calls this once per cell from its terminal colorize step.
pub trait TerrainClassifier: Send + Sync {
    /// Determines the terrain classification at `(x, y)` of `region`.
    fn classify(&self, region: &Region, x: u32, y: u32) -> Result<TerrainKind, ClassifyError>;
}
