//! Data model, packing, and covariance-texture generation for a 3D Gaussian
//! Splatting scene. Pure and stateless: no GPU, no threads, one pass per
//! scene load.

mod covariance;
mod error;
mod half;
mod packed;
mod splat;
mod texture;

pub use covariance::{covariance, rotation_matrix, Sigma6};
pub use error::CoreError;
pub use half::{f32_to_f16_bits, pack_half_2x16};
pub use packed::{pack, PackedBuffer, PackedRecord};
pub use splat::{SceneMetadata, SplatSet};
pub use texture::{build_covariance_texture, CovarianceTexture, COVARIANCE_SCALE, TEXTURE_WIDTH};
