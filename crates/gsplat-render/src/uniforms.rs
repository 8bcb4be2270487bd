use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::camera::Camera;

/// GPU-layout mirror of the `Uniforms` struct in `splat.wgsl`: projection,
/// view, focal length, viewport, and the axis-length cap, in that order
/// with no padding beyond what `mat4x4<f32>` already implies.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Uniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub focal: [f32; 2],
    pub viewport: [f32; 2],
    pub axis_cap: f32,
    pub _pad: [f32; 3],
}

const _: () = assert!(std::mem::size_of::<Uniforms>() == 4 * 4 * 4 * 2 + 4 * 4 + 4 * 4);

impl Uniforms {
    /// `axis_cap` is the maximum major/minor axis length in pixels, an
    /// arbitrary cap to bound fragment coverage; exposed here rather than
    /// hardcoded in the shader.
    pub fn from_camera(camera: &Camera, viewport: (f32, f32), axis_cap: f32) -> Self {
        let to_cols = |m: Mat4| -> [[f32; 4]; 4] {
            let c = m.to_cols_array_2d();
            [c[0], c[1], c[2], c[3]]
        };
        let focal = camera.focal(viewport);
        Self {
            projection: to_cols(camera.projection(viewport)),
            view: to_cols(camera.view()),
            focal: [focal.0, focal.1],
            viewport: [viewport.0, viewport.1],
            axis_cap,
            _pad: [0.0; 3],
        }
    }
}
