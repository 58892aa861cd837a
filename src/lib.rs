//! Deterministic, off-thread terrain preview generation.
//!
//! This crate ties the `ssc-*` workspace members into one facade: a
//! [`PreviewGenerator`] that accepts [`PreviewRequest`]s, runs them one at a
//! time on a dedicated background thread against a throwaway
//! [`Region`](ssc_region::Region), and hands the colored pixels back through
//! a [`Promise`](ssc_worker::Promise) delivered on the orchestrator's tick.
//!
//! Determinism is the core contract: a preview is a pure function of
//! `(world seed, location, step filter)`. Identical requests produce
//! byte-identical pixel buffers, regardless of queue pressure or timing.

pub use ssc_core as core;
pub use ssc_pipeline as pipeline;
pub use ssc_region as region;
pub use ssc_rng as rng;
pub use ssc_worker as worker;

mod context;
pub use context::{current_region, is_generating_on_current_thread};

mod error;
pub use error::*;

mod generator;
pub use generator::*;

mod job;

mod request;
pub use request::*;

mod result;
pub use result::*;
