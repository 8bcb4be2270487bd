use wgpu::util::DeviceExt;

use crate::uniforms::Uniforms;

/// GPU-side resources whose lifetime matches the scene: the covariance
/// texture and the reallocatable per-instance index buffer. The quad
/// itself has no vertex buffer — its four corners are a shader constant
/// indexed by `@builtin(vertex_index)`. Created once per scene load;
/// destroyed on unload.
pub struct SceneResources {
    pub texture: wgpu::Texture,
    pub texture_view: wgpu::TextureView,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl SceneResources {
    /// Uploads a freshly built covariance texture (the `TexData` worker
    /// response), replacing any previous scene's resources.
    pub fn upload_texture(device: &wgpu::Device, queue: &wgpu::Queue, data: &[u32], width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gsplat-covariance-texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Uint,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if !data.is_empty() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                bytemuck::cast_slice(data),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4 * 4),
                    rows_per_image: Some(height.max(1)),
                },
                size,
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Replaces the per-instance index buffer with a freshly sorted order.
    /// Reallocated on each accepted sort, matching the DYNAMIC usage hint.
    pub fn upload_indices(device: &wgpu::Device, indices: &[u32]) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gsplat-instance-indices"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }
}

pub fn uniform_buffer(device: &wgpu::Device, uniforms: &Uniforms) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("gsplat-uniforms"),
        contents: bytemuck::bytes_of(uniforms),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}
