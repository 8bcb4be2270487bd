use thiserror::Error;

/// Errors surfaced by the worker actor.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Covariance generation failed during `load`; the scene never becomes
    /// bound and the caller keeps whatever scene was previously active.
    #[error("failed to build covariance texture for scene load: {0}")]
    CovarianceGeneration(#[from] gsplat_core::CoreError),

    /// The worker thread has already exited (e.g. the scene was unloaded),
    /// so requests and responses can no longer be exchanged.
    #[error("worker thread is no longer running")]
    WorkerGone,
}
