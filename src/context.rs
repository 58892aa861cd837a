//! The thread-local generation context.
//!
//! While a preview job runs, its region is published here so code deep in
//! the generation steps can ask "am I running inside a preview job, and
//! against which region?" without threading a handle through every call.

use std::cell::RefCell;
use std::sync::Arc;

use ssc_region::Region;

thread_local! {
    static CURRENT_REGION: RefCell<Option<Arc<Region>>> = const { RefCell::new(None) };
}

/// Returns whether the current thread is inside a preview generation job.
pub fn is_generating_on_current_thread() -> bool {
    CURRENT_REGION.with(|cell| cell.borrow().is_some())
}

/// The region of the preview job running on the current thread, if any.
pub fn current_region() -> Option<Arc<Region>> {
    CURRENT_REGION.with(|cell| cell.borrow().clone())
}

/// Publishes a region as the current thread's generation context for the
/// scope's lifetime.
///
/// The context is cleared on drop, so it cannot leak past the job even when
/// the job panics.
pub(crate) struct GenerationScope;

impl GenerationScope {
    pub(crate) fn enter(region: Arc<Region>) -> Self {
        CURRENT_REGION.with(|cell| {
            let mut current = cell.borrow_mut();
            debug_assert!(current.is_none(), "nested generation scopes");
            *current = Some(region);
        });
        Self
    }
}

impl Drop for GenerationScope {
    fn drop(&mut self) {
        CURRENT_REGION.with(|cell| *cell.borrow_mut() = None);
    }
}
