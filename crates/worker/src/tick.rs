use parking_lot::Mutex;

/// A list of one-shot callbacks to run on the next orchestrator tick.
///
/// This is the sole crossing point between the worker thread and whatever
/// threading constraints the orchestrating side has: the worker never
/// invokes continuations in place, it only appends them here, and the
/// orchestrator drains the list once per tick from its own thread.
#[derive(Default)]
pub struct TickQueue {
    pending: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
}

impl TickQueue {
    /// Creates a new, empty [`TickQueue`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a callback to run on the next [`run_pending`] call.
    ///
    /// [`run_pending`]: TickQueue::run_pending
    pub fn schedule(&self, callback: impl FnOnce() + Send + 'static) {
        self.pending.lock().push(Box::new(callback));
    }

    /// Runs every callback scheduled so far, in registration order, each
    /// exactly once.
    ///
    /// Callbacks scheduled while this runs (including from the callbacks
    /// themselves) are deferred to the next call.
    pub fn run_pending(&self) {
        let drained = std::mem::take(&mut *self.pending.lock());
        for callback in drained {
            callback();
        }
    }

    /// The number of callbacks waiting for the next tick.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}
