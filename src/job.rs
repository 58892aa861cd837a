use std::hash::BuildHasherDefault;
use std::sync::Arc;

use hashbrown::HashMap;
use rustc_hash::FxHasher;
use ssc_core::PixelBuffer;
use ssc_pipeline::{ColorSchemes, GeneratorDef, GeneratorId, StepOptions, TerrainClassifier};
use ssc_region::Region;
use ssc_rng::utility;
use ssc_worker::Worker;

use crate::context::GenerationScope;
use crate::{PreviewConfig, PreviewError, PreviewRequest, PreviewResult, WorldContext};

/// The worker state executing preview requests on the background thread.
pub(crate) struct PreviewWorker {
    pub(crate) world: Arc<dyn WorldContext>,
    pub(crate) classifier: Arc<dyn TerrainClassifier>,
    pub(crate) generators: HashMap<GeneratorId, GeneratorDef, BuildHasherDefault<FxHasher>>,
    pub(crate) schemes: ColorSchemes,
    pub(crate) config: PreviewConfig,
}

impl Worker for PreviewWorker {
    type Input = PreviewRequest;
    type Ok = PreviewResult;
    type Err = PreviewError;

    #[profiling::function]
    fn run(&mut self, mut request: PreviewRequest) -> Result<PreviewResult, PreviewError> {
        // Context may have gone away between submission and execution; this
        // is checked here, on the worker thread, not at submission time.
        if !self.world.is_active() {
            return Err(PreviewError::MissingContext);
        }

        let def = self
            .generators
            .get(&request.generator_id)
            .ok_or(PreviewError::UnknownGenerator(request.generator_id.0))?;

        let max = self.config.max_texture_size;
        if request.texture_size.x > max.x || request.texture_size.y > max.y {
            return Err(PreviewError::TextureTooLarge {
                requested: request.texture_size.into(),
                max: max.into(),
            });
        }

        let location = self
            .world
            .location(request.location_id)
            .ok_or(PreviewError::UnknownLocation(request.location_id))?;

        log::trace!(
            "generating preview of location {} ({}x{})",
            request.location_id,
            request.map_size.x,
            request.map_size.y,
        );

        let region = Arc::new(Region::build(
            request.map_size,
            request.location_id,
            &location,
        ));
        let _scope = GenerationScope::enter(region.clone());

        let mut buffer = match request.existing_buffer.take() {
            Some(existing) => PixelBuffer::recycled(existing, request.texture_size),
            None => PixelBuffer::new(request.texture_size),
        };

        // Every draw of the run derives from the world seed and the
        // location, so two previews of the same location always agree.
        let seed = utility::combine(request.seed, request.location_id as u64);
        let palette = self.schemes.select(request.alternate_colors);
        let filter = request.step_filter.clone();
        let options = StepOptions {
            skip_expensive_substep: request.skip_expensive_substep,
        };

        let output = ssc_pipeline::run(
            &region,
            def,
            &|name| filter(name),
            seed,
            &*self.classifier,
            palette,
            options,
            &mut buffer,
        );

        Ok(PreviewResult {
            pixels: buffer,
            request: Arc::new(request),
            region: Some(region),
            invalid_cell_count: output.invalid_cells,
            errored: output.errored,
        })
    }
}
