use clap::Parser;
use gsplat_core::{pack, SceneMetadata, SplatSet};
use gsplat_render::{Camera, Uniforms};
use gsplat_sort::{Worker, WorkerRequest, WorkerResponse};
use rand::Rng;

/// Exercises the splat rasterization core against a synthetically
/// generated point cloud, since the PLY parser and host panel are
/// out of scope here.
#[derive(Parser)]
#[command(author, version, about = "gsplat-cli - synthetic splat pipeline demo")]
struct Cli {
    /// Number of splats in the generated cloud.
    #[arg(long, default_value_t = 20_000)]
    count: u32,

    /// Opacity-byte cutoff in [1, 255]; a value of 1 keeps all non-zero-opacity splats.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=255))]
    alpha_cutoff: u8,

    /// Pixel cap on a splat's projected major/minor axis.
    #[arg(long, default_value_t = 1024.0)]
    axis_cap: f32,
}

fn synthetic_scene(count: u32) -> SplatSet {
    let mut rng = rand::rng();
    let mut positions = Vec::with_capacity(3 * count as usize);
    let mut scales = Vec::with_capacity(3 * count as usize);
    let mut rotations = Vec::with_capacity(4 * count as usize);
    let mut opacities = Vec::with_capacity(count as usize);
    let mut colors = Vec::with_capacity(3 * count as usize);

    for _ in 0..count {
        positions.extend([
            rng.random_range(-5.0..5.0),
            rng.random_range(-5.0..5.0),
            rng.random_range(-5.0..5.0),
        ]);
        scales.extend([
            rng.random_range(0.01..0.2),
            rng.random_range(0.01..0.2),
            rng.random_range(0.01..0.2),
        ]);
        let raw = [
            rng.random_range(-1.0..1.0f32),
            rng.random_range(-1.0..1.0f32),
            rng.random_range(-1.0..1.0f32),
            rng.random_range(-1.0..1.0f32),
        ];
        let norm = (raw[0] * raw[0] + raw[1] * raw[1] + raw[2] * raw[2] + raw[3] * raw[3]).sqrt();
        rotations.extend(raw.map(|c| c / norm));
        opacities.push(rng.random_range(0.1..1.0));
        colors.extend([
            rng.random_range(0.0..1.0),
            rng.random_range(0.0..1.0),
            rng.random_range(0.0..1.0),
        ]);
    }

    SplatSet {
        count,
        positions,
        scales,
        rotations,
        opacities,
        colors,
        metadata: SceneMetadata::default(),
    }
}

/// Reports the GPU backend name the host would render with, falling back
/// to "cpu" if no suitable adapter is present.
fn detect_backend() -> String {
    let instance = wgpu::Instance::default();
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()));
    match adapter {
        Ok(adapter) => format!("{:?}", adapter.get_info().backend),
        Err(_) => {
            log::warn!("no suitable GPU adapter found, falling back to the CPU-sort-only path");
            "cpu".to_string()
        }
    }
}

fn recv_blocking(worker: &Worker) -> anyhow::Result<WorkerResponse> {
    worker
        .recv()
        .ok_or_else(|| anyhow::anyhow!("sort worker exited before responding"))
}

fn main() -> anyhow::Result<()> {
    env_logger::builder().target(env_logger::Target::Stdout).init();

    let args = Cli::parse();
    let _span = tracing::trace_span!("gsplat_cli_run", count = args.count).entered();

    let scene = synthetic_scene(args.count);
    let buffer = pack(&scene)?;

    let worker = Worker::spawn();
    worker.send(WorkerRequest::Load {
        count: scene.count,
        buffer,
    })?;
    match recv_blocking(&worker)? {
        WorkerResponse::TexData { width, height, .. } => {
            log::info!("covariance texture ready: {width}x{height}");
        }
        WorkerResponse::LoadError(message) => {
            anyhow::bail!("scene load failed: {message}");
        }
        other => anyhow::bail!("unexpected worker response during load: {other:?}"),
    }

    worker.send(WorkerRequest::SetAlpha(args.alpha_cutoff))?;

    let camera = Camera::new(
        glam::Vec3::new(0.0, 0.0, 15.0),
        glam::Quat::IDENTITY,
        std::f32::consts::FRAC_PI_3,
        0.1,
        100.0,
    );
    let viewport = (1280.0, 720.0);
    let uniforms = Uniforms::from_camera(&camera, viewport, args.axis_cap);
    log::debug!("built uniforms with axis_cap={}", uniforms.axis_cap);
    worker.send(WorkerRequest::Sort(Box::new(camera.view_proj_columns(viewport))))?;

    let visible_count = loop {
        match recv_blocking(&worker)? {
            WorkerResponse::Indices { visible_count, .. } => break visible_count,
            WorkerResponse::TexData { .. } => continue,
            WorkerResponse::LoadError(message) => anyhow::bail!("scene load failed: {message}"),
        }
    };

    let backend = detect_backend();
    println!("{visible_count} splats [{backend}]");

    Ok(())
}
