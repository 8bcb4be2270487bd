use thiserror::Error;

/// Initialization and pipeline errors. Per the failure taxonomy these are
/// fatal to the render pipeline; per-frame and per-splat problems never
/// surface here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter was found")]
    NoSuitableAdapter,

    #[error("failed to request a GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("the sort worker is gone")]
    WorkerGone(#[from] gsplat_sort::WorkerError),

    #[error("scene load failed: {0}")]
    SceneLoad(#[from] gsplat_core::CoreError),
}
