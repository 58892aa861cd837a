use std::sync::Arc;

use parking_lot::Mutex;

use crate::TickQueue;

type Callback<T, E> = Box<dyn FnOnce(&Result<T, E>) + Send>;

enum State<T, E> {
    Pending(Vec<Callback<T, E>>),
    Settled(Arc<Result<T, E>>),
}

/// A single-assignment future.
///
/// A [`Promise`] transitions exactly once from pending to settled (resolved
/// with a value or rejected with an error). Continuations may be registered
/// both before and after settlement:
///
/// - continuations registered while pending are delivered through the
///   promise's [`TickQueue`], i.e. they run on the next orchestrator tick
///   rather than in place on the settling thread;
/// - continuations registered after settlement run immediately and
///   synchronously on the registering thread.
pub struct Promise<T, E> {
    state: Arc<Mutex<State<T, E>>>,
    tick: Arc<TickQueue>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            tick: self.tick.clone(),
        }
    }
}

// The settled value is shared behind an `Arc` between the settling thread
// and every continuation, so both sides of the result must be `Sync`.
impl<T: Send + Sync + 'static, E: Send + Sync + 'static> Promise<T, E> {
    /// Creates a new, pending [`Promise`] delivering its continuations
    /// through the provided tick queue.
    pub fn new(tick: Arc<TickQueue>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::Pending(Vec::new()))),
            tick,
        }
    }

    /// Settles the promise with a value.
    ///
    /// # Panics
    ///
    /// Panics if the promise has already settled.
    pub fn resolve(&self, value: T) {
        self.settle(Ok(value));
    }

    /// Settles the promise with an error.
    ///
    /// # Panics
    ///
    /// Panics if the promise has already settled.
    pub fn reject(&self, error: E) {
        self.settle(Err(error));
    }

    fn settle(&self, result: Result<T, E>) {
        let result = Arc::new(result);

        let callbacks = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, State::Settled(result.clone())) {
                State::Pending(callbacks) => callbacks,
                State::Settled(_) => panic!("promise settled twice"),
            }
        };

        if !callbacks.is_empty() {
            self.tick.schedule(move || {
                for callback in callbacks {
                    callback(&result);
                }
            });
        }
    }

    /// Registers a continuation.
    ///
    /// If the promise is still pending, the continuation runs on the
    /// orchestrator tick following settlement; if it has already settled,
    /// the continuation runs right away on the calling thread.
    pub fn on_settled(&self, callback: impl FnOnce(&Result<T, E>) + Send + 'static) {
        let settled = {
            let mut state = self.state.lock();
            match &mut *state {
                State::Pending(callbacks) => {
                    callbacks.push(Box::new(callback));
                    return;
                }
                State::Settled(result) => result.clone(),
            }
        };

        callback(&settled);
    }

    /// Returns the settled outcome, or `None` while pending.
    pub fn outcome(&self) -> Option<Arc<Result<T, E>>> {
        match &*self.state.lock() {
            State::Pending(_) => None,
            State::Settled(result) => Some(result.clone()),
        }
    }

    /// Returns whether the promise has settled.
    pub fn is_settled(&self) -> bool {
        matches!(&*self.state.lock(), State::Settled(_))
    }
}
