//! Covariance texture generation: the two-texels-per-splat layout the
//! vertex shader decodes.

use crate::covariance::covariance;
use crate::error::CoreError;
use crate::half::pack_half_2x16;
use crate::packed::PackedBuffer;

pub const TEXTURE_WIDTH: u32 = 2048;

/// Wire-format scale applied to covariance entries before half-float
/// packing. Not documented anywhere but the encoder/decoder contract; must
/// match the WGSL decode exactly.
pub const COVARIANCE_SCALE: f32 = 4.0;

/// The two-texels-per-splat integer texture consumed by the vertex shader.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceTexture {
    pub data: Vec<u32>,
    pub width: u32,
    pub height: u32,
}

fn decode_quat_byte(b: u8) -> f32 {
    (b as f32 - 128.0) / 128.0
}

/// Builds the covariance texture for an entire scene (once per load).
///
/// An isolated splat with non-finite covariance is logged and its texel pair
/// left zeroed (per-splat degeneracy, absorbed silently). If *every* splat in
/// a non-empty scene is degenerate, the input is almost certainly corrupt
/// rather than numerically unlucky, and the whole load fails instead.
pub fn build_covariance_texture(buf: &PackedBuffer) -> Result<CovarianceTexture, CoreError> {
    let _span = tracing::trace_span!("build_covariance_texture", count = buf.len()).entered();

    let n = buf.len();
    let width = TEXTURE_WIDTH;
    let height = if n == 0 {
        0
    } else {
        (2 * n as u64).div_ceil(width as u64) as u32
    };

    let mut data = vec![0_u32; (width as usize) * (height as usize) * 4];
    let mut degenerate_count = 0_usize;

    for (i, rec) in buf.records().iter().enumerate() {
        let texel0 = 2 * i;
        let texel1 = 2 * i + 1;
        let base0 = texel0 * 4;
        let base1 = texel1 * 4;

        data[base0] = rec.position[0].to_bits();
        data[base0 + 1] = rec.position[1].to_bits();
        data[base0 + 2] = rec.position[2].to_bits();
        data[base0 + 3] = u32::from_le_bytes(rec.rgba);

        let quat = [
            decode_quat_byte(rec.quat[0]),
            decode_quat_byte(rec.quat[1]),
            decode_quat_byte(rec.quat[2]),
            decode_quat_byte(rec.quat[3]),
        ];
        let sigma = covariance(quat, rec.scale);
        let finite = sigma.0.is_finite()
            && sigma.1.is_finite()
            && sigma.2.is_finite()
            && sigma.3.is_finite()
            && sigma.4.is_finite()
            && sigma.5.is_finite();

        if finite {
            data[base1] = pack_half_2x16(COVARIANCE_SCALE * sigma.0, COVARIANCE_SCALE * sigma.1);
            data[base1 + 1] =
                pack_half_2x16(COVARIANCE_SCALE * sigma.2, COVARIANCE_SCALE * sigma.3);
            data[base1 + 2] =
                pack_half_2x16(COVARIANCE_SCALE * sigma.4, COVARIANCE_SCALE * sigma.5);
        } else {
            log::warn!("splat {i} has non-finite covariance, zeroing its texel");
            degenerate_count += 1;
        }
        // word 3 of texel1 is spare, left zero-initialized.
    }

    if n > 0 && degenerate_count == n {
        return Err(CoreError::AllCovariancesDegenerate { count: n });
    }

    Ok(CovarianceTexture {
        data,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packed::pack;
    use crate::splat::{SceneMetadata, SplatSet};

    fn splats(n: u32) -> SplatSet {
        SplatSet {
            count: n,
            positions: vec![0.0; 3 * n as usize],
            scales: vec![1.0; 3 * n as usize],
            rotations: (0..n).flat_map(|_| [1.0, 0.0, 0.0, 0.0]).collect(),
            opacities: vec![1.0; n as usize],
            colors: vec![1.0; 3 * n as usize],
            metadata: SceneMetadata::default(),
        }
    }

    #[test]
    fn empty_scene_has_zero_height() {
        let buf = pack(&splats(0)).unwrap();
        let tex = build_covariance_texture(&buf).unwrap();
        assert_eq!(tex.height, 0);
        assert!(tex.data.is_empty());
    }

    #[test]
    fn dimensions_match_splat_count() {
        let buf = pack(&splats(2049)).unwrap();
        let tex = build_covariance_texture(&buf).unwrap();
        assert_eq!(tex.width, TEXTURE_WIDTH);
        // 2 * 2049 = 4098 texels -> ceil(4098/2048) = 3 rows.
        assert_eq!(tex.height, 3);
    }

    #[test]
    fn position_round_trips_bit_for_bit() {
        let mut set = splats(1);
        set.positions = vec![1.5, -2.25, 3.0];
        let buf = pack(&set).unwrap();
        let tex = build_covariance_texture(&buf).unwrap();
        assert_eq!(f32::from_bits(tex.data[0]), 1.5);
        assert_eq!(f32::from_bits(tex.data[1]), -2.25);
        assert_eq!(f32::from_bits(tex.data[2]), 3.0);
    }

    #[test]
    fn identity_quaternion_unit_scale_gives_diagonal_sigma() {
        let buf = pack(&splats(1)).unwrap();
        let tex = build_covariance_texture(&buf).unwrap();
        // texel 1 is at flattened index 2, base word = 2*4 = 8.
        let word0 = tex.data[8];
        let word1 = tex.data[9];
        let word2 = tex.data[10];
        // sigma00 = sigma11 = sigma22 = 1.0, all off-diagonal = 0, scaled by 4.
        assert_eq!(word0 & 0xFFFF, crate::half::f32_to_f16_bits(4.0) as u32);
        assert_eq!(word0 >> 16, 0);
        assert_eq!(word1 & 0xFFFF, 0);
        assert_eq!(word1 >> 16, crate::half::f32_to_f16_bits(4.0) as u32);
        assert_eq!(word2 & 0xFFFF, 0);
        assert_eq!(word2 >> 16, crate::half::f32_to_f16_bits(4.0) as u32);
    }

    #[test]
    fn all_splats_non_finite_fails_the_whole_load() {
        let mut set = splats(3);
        set.scales = vec![f32::NAN; 9];
        let buf = pack(&set).unwrap();
        let err = build_covariance_texture(&buf).unwrap_err();
        assert!(matches!(err, CoreError::AllCovariancesDegenerate { count: 3 }));
    }

    #[test]
    fn one_degenerate_splat_among_many_does_not_fail_the_load() {
        let mut set = splats(2);
        // Splat 0 gets a NaN scale; splat 1 stays well-formed.
        set.scales[0] = f32::NAN;
        let buf = pack(&set).unwrap();
        let tex = build_covariance_texture(&buf).unwrap();
        assert_eq!(tex.data[8], 0); // splat 0's texel1 word0 left zeroed.
    }
}
