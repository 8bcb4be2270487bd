//! GPU pipeline: camera/uniform layout, the wgpu render pipeline, and the
//! `Renderer` that owns a worker handle alongside the GPU-side resources.

mod camera;
mod error;
mod pipeline;
mod renderer;
mod resources;
mod uniforms;

pub use camera::Camera;
pub use error::RenderError;
pub use pipeline::{create_bind_group, create_bind_group_layout, create_pipeline};
pub use renderer::Renderer;
pub use resources::SceneResources;
pub use uniforms::Uniforms;
