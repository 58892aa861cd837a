use std::sync::Arc;

use ssc_core::PixelBuffer;
use ssc_region::Region;

use crate::PreviewRequest;

/// A completed terrain preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// The colored pixels, sized to the request's `texture_size`; pixels
    /// outside `map_size` are untouched.
    pub pixels: PixelBuffer,
    /// The request this result answers. The request's recycled buffer has
    /// been consumed into `pixels`.
    pub request: Arc<PreviewRequest>,
    /// The throwaway region the preview was generated against, kept around
    /// for introspection (water info, indices). Consumers that do not need
    /// it should drop it promptly.
    pub region: Option<Arc<Region>>,
    /// The number of cells whose classification could not be resolved.
    pub invalid_cell_count: u32,
    /// Whether the preview is degraded (some cells painted with the error
    /// color instead of their real classification).
    pub errored: bool,
}
