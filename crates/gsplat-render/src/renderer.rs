use gsplat_core::{pack, SplatSet};
use gsplat_sort::{Worker, WorkerRequest, WorkerResponse};

use crate::camera::Camera;
use crate::error::RenderError;
use crate::pipeline::{create_bind_group, create_bind_group_layout, create_pipeline};
use crate::resources::{uniform_buffer, SceneResources};
use crate::uniforms::Uniforms;

const DEFAULT_AXIS_CAP: f32 = 1024.0;

/// Owns the GPU pipeline, the worker handle, and the resources for
/// whichever scene is currently loaded. One `Renderer` per canvas.
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    worker: Worker,
    axis_cap: f32,

    uniform_buffer: wgpu::Buffer,
    scene: Option<SceneResources>,
    bind_group: Option<wgpu::BindGroup>,
    visible_count: u32,
}

impl Renderer {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, surface_format: wgpu::TextureFormat) -> Self {
        Self::with_axis_cap(device, queue, surface_format, DEFAULT_AXIS_CAP)
    }

    /// `axis_cap` is the pixel cap on a splat's major/minor screen axis
    /// (an implementation-exposed knob; changing the default is not
    /// recommended without checking worst-case fragment cost).
    pub fn with_axis_cap(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        axis_cap: f32,
    ) -> Self {
        let bind_group_layout = create_bind_group_layout(&device);
        let pipeline = create_pipeline(&device, &bind_group_layout, surface_format);
        let identity_uniforms = Uniforms::from_camera(
            &Camera::new(glam::Vec3::ZERO, glam::Quat::IDENTITY, 1.0, 0.1, 100.0),
            (1.0, 1.0),
            axis_cap,
        );
        let uniform_buffer = uniform_buffer(&device, &identity_uniforms);
        let worker = Worker::spawn();

        Self {
            device,
            queue,
            bind_group_layout,
            pipeline,
            worker,
            axis_cap,
            uniform_buffer,
            scene: None,
            bind_group: None,
            visible_count: 0,
        }
    }

    /// Packs and hands a scene to the worker. The covariance texture
    /// arrives asynchronously via [`Self::poll_worker`].
    pub fn load_scene(&self, splats: &SplatSet) -> Result<(), RenderError> {
        let buffer = pack(splats)?;
        self.worker.send(WorkerRequest::Load {
            count: splats.count,
            buffer,
        })?;
        Ok(())
    }

    /// Builds the current camera's view-projection matrix, uploads fresh
    /// uniforms, and forwards the matrix to the worker as a sort request.
    pub fn update_camera(&self, camera: &Camera, viewport: (f32, f32)) -> Result<(), RenderError> {
        let uniforms = Uniforms::from_camera(camera, viewport, self.axis_cap);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.worker
            .send(WorkerRequest::Sort(Box::new(camera.view_proj_columns(viewport))))?;
        Ok(())
    }

    pub fn set_alpha_cutoff(&self, cutoff: u8) -> Result<(), RenderError> {
        self.worker.send(WorkerRequest::SetAlpha(cutoff))?;
        Ok(())
    }

    /// Drains pending worker responses and applies them to GPU state.
    /// Call once per frame before [`Self::draw`].
    pub fn poll_worker(&mut self) {
        let _span = tracing::trace_span!("renderer_poll_worker").entered();
        while let Some(response) = self.worker.try_recv() {
            match response {
                WorkerResponse::TexData {
                    data,
                    width,
                    height,
                } => {
                    let (texture, texture_view) =
                        SceneResources::upload_texture(&self.device, &self.queue, &data, width, height);
                    let bind_group = create_bind_group(
                        &self.device,
                        &self.bind_group_layout,
                        &self.uniform_buffer,
                        &texture_view,
                    );
                    self.scene = Some(SceneResources {
                        texture,
                        texture_view,
                        index_buffer: SceneResources::upload_indices(&self.device, &[]),
                        index_count: 0,
                    });
                    self.bind_group = Some(bind_group);
                    self.visible_count = 0;
                }
                WorkerResponse::Indices {
                    indices,
                    visible_count,
                    ..
                } => {
                    if let Some(scene) = self.scene.as_mut() {
                        scene.index_buffer = SceneResources::upload_indices(&self.device, &indices);
                        scene.index_count = visible_count;
                    }
                    self.visible_count = visible_count;
                }
                WorkerResponse::LoadError(message) => {
                    log::warn!("scene load failed, keeping the prior scene bound: {message}");
                }
            }
        }
    }

    /// Binds the latest texture and index buffer and issues one instanced
    /// draw call, four vertices per instance, `instance_count = visible_count`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let _span = tracing::trace_span!("renderer_draw", visible_count = self.visible_count).entered();
        let (Some(scene), Some(bind_group)) = (self.scene.as_ref(), self.bind_group.as_ref()) else {
            return;
        };
        if scene.index_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, scene.index_buffer.slice(..));
        pass.draw(0..4, 0..scene.index_count);
    }

    pub fn visible_count(&self) -> u32 {
        self.visible_count
    }
}
