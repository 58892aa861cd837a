use glam::UVec2;
use ssc_core::{Grid, PixelBuffer};
use ssc_region::Region;

use crate::{Grids, Palette, TerrainClassifier};

/// The elevation at or above which a non-river cell renders as solid rock.
pub const HIGH_ELEVATION: f32 = 0.7;

/// The fixed colors of the synthetic terminal step and the bevel pass.
pub mod colors {
    use ssc_core::Color;

    /// Solid rock above the high-elevation cutoff.
    pub const SOLID_ROCK: Color = Color::rgb(105, 105, 105);
    /// Solid rock with no rock directly above it.
    pub const ROCK_HIGHLIGHT: Color = Color::rgb(140, 140, 140);
    /// Solid rock with no rock directly below it.
    pub const ROCK_SHADOW: Color = Color::rgb(75, 75, 75);
    /// High-elevation cells carved out by the cave grid.
    pub const CAVE: Color = Color::rgb(42, 38, 34);
    /// Cells whose classification could not be resolved.
    pub const CLASSIFY_ERROR: Color = Color::RED;
}

/// The synthetic terminal step of every pipeline run.
///
/// Walks the region's cells in row-major order, resolves each cell's terrain
/// classification and writes one color per cell into `buffer`. Returns the
/// mask of cells classified as solid rock (the input of the bevel pass)
/// along with the number of unresolved cells.
pub(crate) fn colorize(
    region: &Region,
    grids: &Grids,
    classifier: &dyn TerrainClassifier,
    palette: &Palette,
    buffer: &mut PixelBuffer,
) -> (Grid<bool>, u32) {
    let size = region.size();
    let mut rock = Grid::<bool>::new(size);
    let mut invalid_cells = 0u32;

    for y in 0..size.y {
        for x in 0..size.x {
            let color = match classifier.classify(region, x, y) {
                Ok(kind) => {
                    if grids.elevation.get(x, y) >= HIGH_ELEVATION && !kind.is_river() {
                        if grids.caves.get(x, y) > 0.0 {
                            colors::CAVE
                        } else {
                            rock.set(x, y, true);
                            colors::SOLID_ROCK
                        }
                    } else {
                        palette.color_of(kind.id).unwrap_or(palette.missing())
                    }
                }
                Err(err) => {
                    log::trace!("{err}");
                    invalid_cells += 1;
                    colors::CLASSIFY_ERROR
                }
            };

            buffer.set_pixel(x, y, color);
        }
    }

    (rock, invalid_cells)
}

/// The bevel post-pass.
///
/// For every cell *originally* classified as solid rock, in a single
/// top-to-bottom scan per column: if the cell above is not also solid rock
/// (or lies outside the image), the cell is recolored as highlighted rock;
/// otherwise, if the cell below is neither solid rock nor already
/// highlighted/shadowed (out-of-bounds counts as neither), the cell is
/// recolored as shadowed rock.
///
/// The adjacency tests read the rock mask and a beveled mask, never the
/// pixel colors: re-reading the buffer would misclassify an
/// already-recolored neighbor, and a terrain whose palette color happens to
/// equal a bevel shade would wrongly suppress shading.
pub(crate) fn bevel_pass(buffer: &mut PixelBuffer, rock: &Grid<bool>, size: UVec2) {
    let mut beveled = Grid::<bool>::new(size);

    for x in 0..size.x {
        for y in 0..size.y {
            if !rock.get(x, y) {
                continue;
            }

            let above_is_rock = y > 0 && rock.get(x, y - 1);
            if !above_is_rock {
                buffer.set_pixel(x, y, colors::ROCK_HIGHLIGHT);
                beveled.set(x, y, true);
                continue;
            }

            let below_is_rock = y + 1 < size.y && rock.get(x, y + 1);
            let below_is_beveled = y + 1 < size.y && beveled.get(x, y + 1);
            if !below_is_rock && !below_is_beveled {
                buffer.set_pixel(x, y, colors::ROCK_SHADOW);
                beveled.set(x, y, true);
            }
        }
    }
}
