use std::fmt;
use std::sync::Arc;

use glam::UVec2;
use ssc_core::PixelBuffer;
use ssc_pipeline::GeneratorId;

/// A predicate deciding, by name, which generation steps a request runs.
pub type StepFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A request for one terrain preview.
///
/// Requests are immutable once built; the worker consumes the recycled
/// buffer and carries the rest along into the [`PreviewResult`] so consumers
/// can correlate deliveries with what they asked for.
///
/// [`PreviewResult`]: crate::PreviewResult
pub struct PreviewRequest {
    /// The world seed the preview derives from.
    pub seed: u64,
    /// The identifier of the location to preview.
    pub location_id: u32,
    /// The size of the generated map, in cells.
    pub map_size: UVec2,
    /// The size of the output texture, in pixels.
    ///
    /// Pixels outside `map_size` are left untouched.
    pub texture_size: UVec2,
    /// Whether to color with the alternate palette instead of the curated
    /// default.
    pub alternate_colors: bool,
    /// Whether steps should skip their expensive sub-computations.
    pub skip_expensive_substep: bool,
    /// The generator whose step list the preview runs.
    pub generator_id: GeneratorId,
    /// The predicate selecting which of the generator's steps run.
    pub step_filter: StepFilter,
    /// An optional previously delivered buffer whose allocation the job
    /// reuses instead of allocating a fresh one.
    pub existing_buffer: Option<PixelBuffer>,
}

impl PreviewRequest {
    /// Creates a request running every step of `generator_id`, with no
    /// recycled buffer.
    ///
    /// # Panics
    ///
    /// Panics if `map_size` exceeds `texture_size` in either dimension; the
    /// map must fit inside the texture it is rendered into.
    pub fn new(seed: u64, location_id: u32, map_size: UVec2, generator_id: GeneratorId) -> Self {
        Self::with_texture_size(seed, location_id, map_size, map_size, generator_id)
    }

    /// Creates a request rendering a `map_size` map into a (possibly larger)
    /// `texture_size` buffer.
    ///
    /// # Panics
    ///
    /// Panics if `map_size` exceeds `texture_size` in either dimension.
    pub fn with_texture_size(
        seed: u64,
        location_id: u32,
        map_size: UVec2,
        texture_size: UVec2,
        generator_id: GeneratorId,
    ) -> Self {
        assert!(
            map_size.x <= texture_size.x && map_size.y <= texture_size.y,
            "map size {map_size:?} exceeds texture size {texture_size:?}",
        );

        Self {
            seed,
            location_id,
            map_size,
            texture_size,
            alternate_colors: false,
            skip_expensive_substep: false,
            generator_id,
            step_filter: Arc::new(|_| true),
            existing_buffer: None,
        }
    }

    /// Selects the alternate color scheme.
    pub fn with_alternate_colors(mut self, alternate: bool) -> Self {
        self.alternate_colors = alternate;
        self
    }

    /// Requests steps to skip their expensive sub-computations.
    pub fn with_skip_expensive_substep(mut self, skip: bool) -> Self {
        self.skip_expensive_substep = skip;
        self
    }

    /// Restricts the run to the steps accepted by `filter`.
    pub fn with_step_filter(mut self, filter: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.step_filter = Arc::new(filter);
        self
    }

    /// Recycles the allocation of a previously delivered buffer.
    pub fn with_existing_buffer(mut self, buffer: PixelBuffer) -> Self {
        self.existing_buffer = Some(buffer);
        self
    }
}

impl fmt::Debug for PreviewRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewRequest")
            .field("seed", &self.seed)
            .field("location_id", &self.location_id)
            .field("map_size", &self.map_size)
            .field("texture_size", &self.texture_size)
            .field("alternate_colors", &self.alternate_colors)
            .field("skip_expensive_substep", &self.skip_expensive_substep)
            .field("generator_id", &self.generator_id)
            .finish_non_exhaustive()
    }
}
