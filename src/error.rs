use ssc_worker::JobFailure;

/// The ways a preview request can fail.
///
/// Every variant rejects the request's promise; none of them take the worker
/// thread down.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    /// The world context is no longer active; previews cannot be generated
    /// outside a loaded world.
    #[error("no active world context")]
    MissingContext,

    /// The request named a location the world context does not know about.
    #[error("unknown location {0}")]
    UnknownLocation(u32),

    /// The request named a generator that is not registered.
    #[error("unknown generator `{0}`")]
    UnknownGenerator(&'static str),

    /// The requested texture exceeds the configured maximum.
    #[error("requested texture {requested:?} exceeds the maximum {max:?}")]
    TextureTooLarge {
        /// The size the request asked for.
        requested: (u32, u32),
        /// The configured cap.
        max: (u32, u32),
    },

    /// The request was removed from the queue before it started executing.
    #[error("request cancelled before execution")]
    Cancelled,

    /// The generation job panicked; the panic was contained at the job
    /// boundary and the worker keeps serving subsequent requests.
    #[error("generation job panicked: {0}")]
    Panicked(String),
}

impl From<JobFailure> for PreviewError {
    fn from(failure: JobFailure) -> Self {
        match failure {
            JobFailure::Cancelled => Self::Cancelled,
            JobFailure::Panicked(message) => Self::Panicked(message),
        }
    }
}
