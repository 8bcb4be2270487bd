use gsplat_core::PackedBuffer;

/// Messages accepted by the worker, in FIFO arrival order.
pub enum WorkerRequest {
    /// Adopts ownership of a freshly packed scene buffer.
    Load { buffer: PackedBuffer, count: u32 },
    /// Updates the alpha cutoff and forces the next sort to run.
    SetAlpha(u8),
    /// Requests a depth sort for the given view-projection matrix, unless
    /// throttled. Column-major, 16 floats.
    Sort(Box<[f32; 16]>),
}

/// Messages emitted by the worker back to the render context.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    /// Emitted once per `Load`, before any `Sort` response.
    TexData {
        data: Vec<u32>,
        width: u32,
        height: u32,
    },
    /// Emitted per accepted sort.
    Indices {
        indices: Vec<u32>,
        visible_count: u32,
        total_count: u32,
    },
    /// Covariance generation failed during `load`; scene load fails and the
    /// previously bound scene (if any) remains active.
    LoadError(String),
}
