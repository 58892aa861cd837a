use std::hash::BuildHasherDefault;
use std::sync::Arc;
use std::time::Duration;

use glam::UVec2;
use hashbrown::HashMap;
use ssc_pipeline::{ColorSchemes, GeneratorDef, TerrainClassifier};
use ssc_region::LocationInfo;
use ssc_worker::{Promise, TickQueue, WorkerHandle};

use crate::job::PreviewWorker;
use crate::{PreviewError, PreviewRequest, PreviewResult};

/// The world state provider preview jobs read from.
///
/// The real implementation is the live game world; tests substitute a stub.
pub trait WorldContext: Send + Sync {
    /// Whether a world is currently loaded.
    ///
    /// Jobs executing after the world has been torn down fail with
    /// [`MissingContext`] instead of reading stale state.
    ///
    /// [`MissingContext`]: crate::PreviewError::MissingContext
    fn is_active(&self) -> bool;

    /// The metadata of a location, or `None` when the identifier is unknown.
    fn location(&self, id: u32) -> Option<LocationInfo>;
}

/// Tunables of the preview generator.
#[derive(Debug, Clone, Copy)]
pub struct PreviewConfig {
    /// The largest texture a request may ask for.
    pub max_texture_size: UVec2,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_texture_size: UVec2::new(1024, 1024),
        }
    }
}

/// The public entry point of the preview system.
///
/// A [`PreviewGenerator`] owns one background worker thread and a FIFO
/// request queue. Requests are answered through [`Promise`]s whose
/// continuations are delivered when the orchestrating thread calls
/// [`run_scheduled_callbacks`], so consumers never observe results from the
/// worker thread itself.
///
/// [`run_scheduled_callbacks`]: PreviewGenerator::run_scheduled_callbacks
pub struct PreviewGenerator {
    handle: WorkerHandle<PreviewWorker>,
    tick: Arc<TickQueue>,
}

impl PreviewGenerator {
    /// Creates a new [`PreviewGenerator`].
    ///
    /// The worker thread is spawned lazily, on the first queued request.
    pub fn new(
        world: Arc<dyn WorldContext>,
        classifier: Arc<dyn TerrainClassifier>,
        generators: impl IntoIterator<Item = GeneratorDef>,
        schemes: ColorSchemes,
        config: PreviewConfig,
    ) -> Self {
        let generators: HashMap<_, _, BuildHasherDefault<_>> = generators
            .into_iter()
            .map(|def| (def.id, def))
            .collect();
        let tick = Arc::new(TickQueue::new());

        Self {
            handle: WorkerHandle::new(
                PreviewWorker {
                    world,
                    classifier,
                    generators,
                    schemes,
                    config,
                },
                tick.clone(),
            ),
            tick,
        }
    }

    /// Appends a request to the FIFO queue.
    ///
    /// The returned promise settles with the preview once the worker gets to
    /// it; continuations registered before settlement run on a subsequent
    /// [`run_scheduled_callbacks`] call.
    ///
    /// # Panics
    ///
    /// Panics if the generator has been disposed.
    ///
    /// [`run_scheduled_callbacks`]: PreviewGenerator::run_scheduled_callbacks
    pub fn queue_preview_request(
        &self,
        request: PreviewRequest,
    ) -> Promise<PreviewResult, PreviewError> {
        log::trace!("queueing preview request for location {}", request.location_id);
        self.handle.submit(request)
    }

    /// Removes every not-yet-started request from the queue, rejecting each
    /// one's promise with [`PreviewError::Cancelled`].
    ///
    /// A request already executing keeps running to completion.
    pub fn clear_queue(&self) {
        self.handle.clear_queue();
    }

    /// Requests disposal of the generator without blocking.
    ///
    /// Already queued requests still run; new submissions panic. Disposal is
    /// not resumable.
    ///
    /// # Panics
    ///
    /// Panics when called twice.
    pub fn dispose(&self) {
        self.handle.dispose();
    }

    /// Blocks until the worker thread has exited or `timeout` elapses,
    /// returning whether it has exited.
    pub fn wait_for_disposal(&self, timeout: Duration) -> bool {
        self.handle.wait_for_disposal(timeout)
    }

    /// Delivers the continuations of promises that settled since the last
    /// call.
    ///
    /// The orchestrating thread is expected to call this once per tick; it
    /// is the only place pending-registered continuations ever run.
    pub fn run_scheduled_callbacks(&self) {
        self.tick.run_pending();
    }

    /// The number of requests waiting in the queue.
    pub fn pending_count(&self) -> usize {
        self.handle.pending_count()
    }

    /// The number of requests currently executing; never exceeds one.
    pub fn active_count(&self) -> usize {
        self.handle.active_count()
    }
}
