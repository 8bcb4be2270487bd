use std::sync::mpsc;
use std::thread;

use gsplat_core::build_covariance_texture;

use crate::error::WorkerError;
use crate::message::{WorkerRequest, WorkerResponse};
use crate::sort::sort_visible;
use crate::state::{SceneState, ThrottleState};

/// A dedicated cooperative thread owning the packed buffer and performing
/// covariance generation and sorting. Communicates exclusively by message
/// passing; ownership of backing storage transfers through the channel,
/// never shared mutable memory.
pub struct Worker {
    tx: mpsc::Sender<WorkerRequest>,
    rx: mpsc::Receiver<WorkerResponse>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawns the worker thread. One worker per scene.
    pub fn spawn() -> Self {
        let (req_tx, req_rx) = mpsc::channel::<WorkerRequest>();
        let (resp_tx, resp_rx) = mpsc::channel::<WorkerResponse>();

        let handle = thread::Builder::new()
            .name("gsplat-worker".into())
            .spawn(move || run(req_rx, resp_tx))
            .expect("failed to spawn gsplat worker thread");

        Self {
            tx: req_tx,
            rx: resp_rx,
            handle: Some(handle),
        }
    }

    /// Enqueues a request. Requests are FIFO and single-consumer.
    pub fn send(&self, request: WorkerRequest) -> Result<(), WorkerError> {
        self.tx.send(request).map_err(|_| WorkerError::WorkerGone)
    }

    /// Non-blocking poll for the next response, if any is ready. The render
    /// context calls this once per frame and applies whatever arrives, in
    /// arrival order.
    pub fn try_recv(&self) -> Option<WorkerResponse> {
        self.rx.try_recv().ok()
    }

    /// Blocks until the next response arrives, or the worker has exited.
    pub fn recv(&self) -> Option<WorkerResponse> {
        self.rx.recv().ok()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Dropping `tx` unblocks the worker's `recv` loop so it can exit.
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(req_rx: mpsc::Receiver<WorkerRequest>, resp_tx: mpsc::Sender<WorkerResponse>) {
    let mut scene: Option<SceneState> = None;
    let mut throttle = ThrottleState::default();

    while let Ok(request) = req_rx.recv() {
        match request {
            WorkerRequest::Load { buffer, count } => {
                let _span = tracing::trace_span!("worker_load", count).entered();
                let texture = match build_covariance_texture(&buffer) {
                    Ok(texture) => texture,
                    Err(err) => {
                        let message = WorkerError::CovarianceGeneration(err).to_string();
                        log::warn!("{message}; keeping the prior scene bound");
                        if resp_tx.send(WorkerResponse::LoadError(message)).is_err() {
                            return;
                        }
                        continue;
                    }
                };
                scene = Some(SceneState::from_buffer(buffer));
                throttle = ThrottleState::default();

                if resp_tx
                    .send(WorkerResponse::TexData {
                        data: texture.data,
                        width: texture.width,
                        height: texture.height,
                    })
                    .is_err()
                {
                    return;
                }
            }
            WorkerRequest::SetAlpha(cutoff) => {
                throttle.set_alpha(cutoff);
            }
            WorkerRequest::Sort(view_proj) => {
                let Some(scene) = scene.as_ref() else {
                    log::warn!("sort requested before a scene was loaded; ignoring");
                    continue;
                };
                if !throttle.should_sort(&view_proj) {
                    continue;
                }

                let _span = tracing::trace_span!("worker_sort").entered();
                let out = sort_visible(
                    &scene.positions,
                    &scene.alphas,
                    &view_proj,
                    throttle.alpha_cutoff(),
                );

                if resp_tx
                    .send(WorkerResponse::Indices {
                        indices: out.indices,
                        visible_count: out.visible_count,
                        total_count: out.total_count,
                    })
                    .is_err()
                {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsplat_core::{pack, SceneMetadata, SplatSet};
    use std::time::Duration;

    fn splats(n: u32) -> SplatSet {
        SplatSet {
            count: n,
            positions: (0..n).flat_map(|i| [0.0, 0.0, i as f32]).collect(),
            scales: vec![1.0; 3 * n as usize],
            rotations: (0..n).flat_map(|_| [1.0, 0.0, 0.0, 0.0]).collect(),
            opacities: vec![1.0; n as usize],
            colors: vec![1.0; 3 * n as usize],
            metadata: SceneMetadata::default(),
        }
    }

    fn recv_timeout(worker: &Worker) -> WorkerResponse {
        for _ in 0..200 {
            if let Some(msg) = worker.try_recv() {
                return msg;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("timed out waiting for worker response");
    }

    fn view_proj_z_depth() -> [f32; 16] {
        let mut vp = [0.0_f32; 16];
        vp[10] = 1.0;
        vp
    }

    #[test]
    fn load_emits_texdata_before_any_sort() {
        let worker = Worker::spawn();
        let buf = pack(&splats(4)).unwrap();
        worker
            .send(WorkerRequest::Load {
                count: 4,
                buffer: buf,
            })
            .unwrap();

        match recv_timeout(&worker) {
            WorkerResponse::TexData { width, .. } => assert_eq!(width, 2048),
            other => panic!("expected TexData, got {other:?}"),
        }
    }

    #[test]
    fn load_with_all_degenerate_splats_reports_load_error() {
        let worker = Worker::spawn();
        let mut set = splats(2);
        set.scales = vec![f32::NAN; 6];
        let buf = pack(&set).unwrap();
        worker
            .send(WorkerRequest::Load {
                count: 2,
                buffer: buf,
            })
            .unwrap();

        match recv_timeout(&worker) {
            WorkerResponse::LoadError(_) => {}
            other => panic!("expected LoadError, got {other:?}"),
        }
    }

    #[test]
    fn sort_after_load_returns_front_to_back_indices() {
        let worker = Worker::spawn();
        let buf = pack(&splats(3)).unwrap();
        worker
            .send(WorkerRequest::Load {
                count: 3,
                buffer: buf,
            })
            .unwrap();
        recv_timeout(&worker); // TexData

        worker
            .send(WorkerRequest::Sort(Box::new(view_proj_z_depth())))
            .unwrap();
        match recv_timeout(&worker) {
            WorkerResponse::Indices {
                indices,
                visible_count,
                total_count,
            } => {
                assert_eq!(visible_count, 3);
                assert_eq!(total_count, 3);
                assert_eq!(indices, vec![0, 1, 2]);
            }
            other => panic!("expected Indices, got {other:?}"),
        }
    }

    #[test]
    fn repeated_identical_sort_is_throttled() {
        let worker = Worker::spawn();
        let buf = pack(&splats(3)).unwrap();
        worker
            .send(WorkerRequest::Load {
                count: 3,
                buffer: buf,
            })
            .unwrap();
        recv_timeout(&worker);

        let vp = view_proj_z_depth();
        worker.send(WorkerRequest::Sort(Box::new(vp))).unwrap();
        recv_timeout(&worker);

        worker.send(WorkerRequest::Sort(Box::new(vp))).unwrap();
        // A different view that IS sortable proves the worker kept processing,
        // which (combined with try_recv never seeing a second Indices for the
        // throttled request) proves the throttle fired.
        let mut vp2 = vp;
        vp2[2] = 1.0;
        worker.send(WorkerRequest::Sort(Box::new(vp2))).unwrap();

        match recv_timeout(&worker) {
            WorkerResponse::Indices { .. } => {}
            other => panic!("expected Indices, got {other:?}"),
        }
    }
}
