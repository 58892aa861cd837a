//! A single-thread background worker with a FIFO request queue and a
//! future-like result handoff.
//!
//! This is deliberately not a thread pool: a [`WorkerHandle`] owns exactly
//! one dedicated thread, spawned lazily on the first submission, executing
//! at most one job at any instant, strictly in submission order. Consumers
//! receive results through a [`Promise`] whose continuations are delivered
//! on the orchestrator's own tick (see [`TickQueue`]).

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering::SeqCst};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

mod promise;
pub use promise::*;

mod tick;
pub use tick::*;

/// The reason a job's promise was rejected by the queue machinery itself
/// rather than by the job.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobFailure {
    /// The request was removed from the queue before it started executing.
    #[error("request cancelled before execution")]
    Cancelled,
    /// The job panicked; the panic was contained at the job boundary.
    #[error("job panicked: {0}")]
    Panicked(String),
}

/// The state of a background worker.
///
/// The implementation runs every submitted job, one at a time, on the
/// dedicated thread owned by the [`WorkerHandle`].
pub trait Worker: Send + 'static {
    /// The input type of the worker.
    type Input: Send + 'static;
    /// The success type of the worker.
    ///
    /// Settled values are shared behind an `Arc` between the worker thread
    /// and whoever holds the promise, hence the `Sync` bound.
    type Ok: Send + Sync + 'static;
    /// The error type of the worker.
    ///
    /// It must absorb [`JobFailure`] so the queue can reject cancelled and
    /// panicked jobs through the same channel as ordinary failures.
    type Err: Send + Sync + From<JobFailure> + 'static;

    /// Runs the worker with the provided input.
    fn run(&mut self, input: Self::Input) -> Result<Self::Ok, Self::Err>;
}

type Task<W> = (
    <W as Worker>::Input,
    Promise<<W as Worker>::Ok, <W as Worker>::Err>,
);

struct Shared<W: Worker> {
    queue: Mutex<VecDeque<Task<W>>>,
    /// Notified on new work and on dispose.
    work_cv: Condvar,

    /// Set once disposal is requested; the thread exits when this is set
    /// and the queue is empty.
    dispose_requested: AtomicBool,
    /// Misuse guard: `dispose` may run at most once.
    dispose_called: AtomicBool,
    /// Whether the dedicated thread has been spawned yet.
    spawned: AtomicBool,
    /// The number of jobs currently executing (0 or 1 by construction).
    active: AtomicUsize,

    /// Set by the worker thread on exit (or eagerly when disposal happens
    /// before the thread was ever spawned).
    exited: Mutex<bool>,
    exit_cv: Condvar,
}

/// A handle to a single-thread background worker.
///
/// Dropping the handle does not stop the thread; callers are expected to go
/// through [`dispose`]/[`wait_for_disposal`] for orderly shutdown. A
/// disposed worker is not resumable.
///
/// [`dispose`]: WorkerHandle::dispose
/// [`wait_for_disposal`]: WorkerHandle::wait_for_disposal
pub struct WorkerHandle<W: Worker> {
    shared: Arc<Shared<W>>,
    tick: Arc<TickQueue>,
    /// Taken by the dedicated thread when it is first spawned.
    worker: Mutex<Option<W>>,
}

impl<W: Worker> WorkerHandle<W> {
    /// Creates a new [`WorkerHandle`].
    ///
    /// The dedicated thread is not spawned until the first [`submit`] call.
    ///
    /// [`submit`]: WorkerHandle::submit
    pub fn new(worker: W, tick: Arc<TickQueue>) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(VecDeque::new()),
                work_cv: Condvar::new(),
                dispose_requested: AtomicBool::new(false),
                dispose_called: AtomicBool::new(false),
                spawned: AtomicBool::new(false),
                active: AtomicUsize::new(0),
                exited: Mutex::new(false),
                exit_cv: Condvar::new(),
            }),
            tick,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Appends a request to the FIFO queue and wakes the worker thread,
    /// spawning it if this is the first submission.
    ///
    /// # Panics
    ///
    /// Panics if the worker has been disposed; a disposed worker cannot
    /// accept new requests.
    pub fn submit(&self, input: W::Input) -> Promise<W::Ok, W::Err> {
        let promise = Promise::new(self.tick.clone());

        // The dispose check happens under the queue lock: `dispose` flips
        // the flag under the same lock, so an entry either lands before the
        // worker's exit drain (and settles) or the submission panics. It can
        // never slip in after the drain and hang forever.
        {
            let mut queue = self.shared.queue.lock();
            assert!(
                !self.shared.dispose_called.load(SeqCst),
                "worker already disposed",
            );
            queue.push_back((input, promise.clone()));
        }

        self.ensure_spawned();
        self.shared.work_cv.notify_one();
        promise
    }

    /// Atomically empties the pending queue.
    ///
    /// A request that has already been dequeued keeps running to
    /// completion; clearing only affects requests that have not started.
    /// Every removed request's promise is rejected with
    /// [`JobFailure::Cancelled`], so no caller is left waiting on a future
    /// that will never settle.
    pub fn clear_queue(&self) {
        let drained: Vec<Task<W>> = self.shared.queue.lock().drain(..).collect();
        if drained.is_empty() {
            return;
        }

        log::debug!("cleared {} pending requests", drained.len());
        for (_, promise) in drained {
            promise.reject(W::Err::from(JobFailure::Cancelled));
        }
    }

    /// Requests disposal of the worker.
    ///
    /// This never blocks: it signals the worker thread, which exits once
    /// its queue is empty. Pending requests still run; only new submissions
    /// are refused.
    ///
    /// # Panics
    ///
    /// Panics when called twice.
    pub fn dispose(&self) {
        // Flipped under the queue lock to serialize with `submit`; see the
        // comment there.
        {
            let _queue = self.shared.queue.lock();
            assert!(
                !self.shared.dispose_called.swap(true, SeqCst),
                "worker disposed twice",
            );
            self.shared.dispose_requested.store(true, SeqCst);
        }
        self.shared.work_cv.notify_all();

        if !self.shared.spawned.load(SeqCst) {
            // No thread was ever spawned; disposal is trivially complete.
            *self.shared.exited.lock() = true;
            self.shared.exit_cv.notify_all();
        }

        log::debug!("worker disposal requested");
    }

    /// Blocks until the worker thread has exited or `timeout` elapses.
    ///
    /// Returns whether the thread has exited. Timing out is tolerated: the
    /// thread keeps finishing its work in the background and simply can no
    /// longer be observed through this handle.
    pub fn wait_for_disposal(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut exited = self.shared.exited.lock();
        while !*exited {
            if self.shared.exit_cv.wait_until(&mut exited, deadline).timed_out() {
                break;
            }
        }
        *exited
    }

    /// The number of jobs currently executing; never exceeds one.
    pub fn active_count(&self) -> usize {
        self.shared.active.load(SeqCst)
    }

    /// The number of requests waiting in the queue.
    pub fn pending_count(&self) -> usize {
        self.shared.queue.lock().len()
    }

    fn ensure_spawned(&self) {
        if self.shared.spawned.swap(true, SeqCst) {
            return;
        }

        let worker = self
            .worker
            .lock()
            .take()
            .expect("worker state already taken");
        let shared = self.shared.clone();

        std::thread::Builder::new()
            .name("preview-worker".to_owned())
            .spawn(move || worker_loop(worker, shared))
            .expect("failed to spawn the preview worker thread");
    }
}

fn worker_loop<W: Worker>(mut worker: W, shared: Arc<Shared<W>>) {
    log::debug!("worker thread started");

    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.pop_front() {
                    break Some(task);
                }
                if shared.dispose_requested.load(SeqCst) {
                    break None;
                }
                shared.work_cv.wait(&mut queue);
            }
        };

        let Some((input, promise)) = task else { break };

        shared.active.fetch_add(1, SeqCst);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| worker.run(input)));
        shared.active.fetch_sub(1, SeqCst);

        match outcome {
            Ok(Ok(value)) => promise.resolve(value),
            Ok(Err(error)) => promise.reject(error),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("job panicked: {message}");
                promise.reject(W::Err::from(JobFailure::Panicked(message)));
            }
        }
    }

    // The loop only exits with an empty queue, but reject anything that
    // slipped in so no caller hangs on a promise that would never settle.
    for (_, promise) in shared.queue.lock().drain(..) {
        promise.reject(W::Err::from(JobFailure::Cancelled));
    }

    *shared.exited.lock() = true;
    shared.exit_cv.notify_all();
    log::debug!("worker thread exited");
}

/// Extracts a printable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Polls a promise until it settles or the timeout elapses.
    fn wait_settled<T, E>(promise: &Promise<T, E>, timeout: Duration) -> Arc<Result<T, E>>
    where
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(outcome) = promise.outcome() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "promise did not settle in time");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// A gate the test thread can hold closed to keep a job in-flight.
    #[derive(Default)]
    struct Gate {
        open: Mutex<bool>,
        cv: Condvar,
    }

    impl Gate {
        fn open(&self) {
            *self.open.lock() = true;
            self.cv.notify_all();
        }

        fn wait(&self) {
            let mut open = self.open.lock();
            while !*open {
                self.cv.wait(&mut open);
            }
        }
    }

    struct RecordingWorker {
        runs: Arc<Mutex<Vec<u32>>>,
        /// Inputs listed here block on the gate before returning.
        gated: Vec<u32>,
        gate: Arc<Gate>,
    }

    impl Worker for RecordingWorker {
        type Input = u32;
        type Ok = u32;
        type Err = JobFailure;

        fn run(&mut self, input: u32) -> Result<u32, JobFailure> {
            self.runs.lock().push(input);
            if self.gated.contains(&input) {
                self.gate.wait();
            }
            if input == u32::MAX {
                panic!("poisoned input");
            }
            Ok(input * 2)
        }
    }

    fn recording_worker(gated: Vec<u32>) -> (RecordingWorker, Arc<Mutex<Vec<u32>>>, Arc<Gate>) {
        let runs = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new(Gate::default());
        (
            RecordingWorker {
                runs: runs.clone(),
                gated,
                gate: gate.clone(),
            },
            runs,
            gate,
        )
    }

    #[test]
    fn executes_requests_in_fifo_order() {
        let (worker, runs, _) = recording_worker(Vec::new());
        let handle = WorkerHandle::new(worker, Arc::new(TickQueue::new()));

        let promises: Vec<_> = (0..5).map(|i| handle.submit(i)).collect();
        for (i, promise) in promises.iter().enumerate() {
            let outcome = wait_settled(promise, TIMEOUT);
            assert_eq!(*outcome, Ok(i as u32 * 2));
        }

        assert_eq!(*runs.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn at_most_one_job_executes_at_a_time() {
        let (worker, _, gate) = recording_worker(vec![0]);
        let handle = WorkerHandle::new(worker, Arc::new(TickQueue::new()));

        let first = handle.submit(0);
        let rest: Vec<_> = (1..4).map(|i| handle.submit(i)).collect();

        // While the first job is parked on the gate, nothing else runs.
        while handle.active_count() == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(handle.active_count(), 1);
        assert_eq!(handle.pending_count(), 3);

        gate.open();
        wait_settled(&first, TIMEOUT);
        for promise in &rest {
            wait_settled(promise, TIMEOUT);
        }

        assert!(handle.active_count() <= 1);
    }

    #[test]
    fn clearing_the_queue_cancels_pending_requests_only() {
        let (worker, runs, gate) = recording_worker(vec![1]);
        let handle = WorkerHandle::new(worker, Arc::new(TickQueue::new()));

        let first = handle.submit(1);
        let second = handle.submit(2);
        let third = handle.submit(3);

        // Let the first job start, then supersede the rest.
        while handle.active_count() == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }
        handle.clear_queue();
        gate.open();

        assert_eq!(*wait_settled(&first, TIMEOUT), Ok(2));
        assert_eq!(*wait_settled(&second, TIMEOUT), Err(JobFailure::Cancelled));
        assert_eq!(*wait_settled(&third, TIMEOUT), Err(JobFailure::Cancelled));

        // The cancelled requests never executed.
        handle.dispose();
        assert!(handle.wait_for_disposal(TIMEOUT));
        assert_eq!(*runs.lock(), vec![1]);
    }

    #[test]
    fn a_panicking_job_rejects_and_the_loop_survives() {
        let (worker, _, _) = recording_worker(Vec::new());
        let handle = WorkerHandle::new(worker, Arc::new(TickQueue::new()));

        let poisoned = handle.submit(u32::MAX);
        let healthy = handle.submit(3);

        match &*wait_settled(&poisoned, TIMEOUT) {
            Err(JobFailure::Panicked(message)) => assert!(message.contains("poisoned")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(*wait_settled(&healthy, TIMEOUT), Ok(6));
    }

    #[test]
    fn disposal_drains_remaining_work_then_exits() {
        let (worker, runs, _) = recording_worker(Vec::new());
        let handle = WorkerHandle::new(worker, Arc::new(TickQueue::new()));

        let promises: Vec<_> = (0..3).map(|i| handle.submit(i)).collect();
        handle.dispose();

        assert!(handle.wait_for_disposal(TIMEOUT));
        for promise in &promises {
            assert!(promise.is_settled());
        }
        assert_eq!(*runs.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn disposal_without_a_spawned_thread_completes_immediately() {
        let (worker, _, _) = recording_worker(Vec::new());
        let handle = WorkerHandle::new(worker, Arc::new(TickQueue::new()));

        handle.dispose();
        assert!(handle.wait_for_disposal(Duration::from_millis(1)));
    }

    #[test]
    fn submissions_racing_disposal_never_hang() {
        // Whatever order the race resolves in, a submission must either
        // panic (already disposed) or end up with a promise that settles.
        for _ in 0..32 {
            let (worker, _, _) = recording_worker(Vec::new());
            let handle = Arc::new(WorkerHandle::new(worker, Arc::new(TickQueue::new())));

            let disposer = {
                let handle = handle.clone();
                std::thread::spawn(move || handle.dispose())
            };
            let submitted = panic::catch_unwind(AssertUnwindSafe(|| handle.submit(1)));
            disposer.join().unwrap();

            if let Ok(promise) = submitted {
                wait_settled(&promise, TIMEOUT);
            }
            assert!(handle.wait_for_disposal(TIMEOUT));
        }
    }

    #[test]
    #[should_panic(expected = "worker disposed twice")]
    fn double_dispose_panics() {
        let (worker, _, _) = recording_worker(Vec::new());
        let handle = WorkerHandle::new(worker, Arc::new(TickQueue::new()));
        handle.dispose();
        handle.dispose();
    }

    #[test]
    #[should_panic(expected = "worker already disposed")]
    fn submitting_after_dispose_panics() {
        let (worker, _, _) = recording_worker(Vec::new());
        let handle = WorkerHandle::new(worker, Arc::new(TickQueue::new()));
        handle.dispose();
        let _ = handle.submit(1);
    }
}
