use bytemuck::{Pod, Zeroable};

use crate::error::CoreError;
use crate::splat::SplatSet;

/// One 32-byte packed splat record, laid out so it can be reinterpreted
/// as raw bytes for transfer and as typed fields for covariance generation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedRecord {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub rgba: [u8; 4],
    pub quat: [u8; 4],
}

const _: () = assert!(std::mem::size_of::<PackedRecord>() == 32);

/// The packer's sole output: a 32-byte-per-splat buffer, conceptually moved
/// (not copied) into the worker on scene load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedBuffer {
    records: Vec<PackedRecord>,
}

impl PackedBuffer {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PackedRecord] {
        &self.records
    }

    /// Byte view, e.g. for transmitting the buffer or reading alpha bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    pub fn alpha_byte(&self, i: usize) -> u8 {
        self.records[i].rgba[3]
    }
}

fn encode_unit(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn encode_signed(v: f32) -> u8 {
    (v.clamp(-1.0, 1.0) * 128.0 + 128.0).round() as u8
}

/// Packs a normalized splat set into a 32-byte-per-splat buffer.
///
/// Deterministic and stateless: identical input produces a bit-identical
/// buffer. The only policy applied is the clamp+round in the packed-record
/// encoding table; no other validation or transformation happens here.
pub fn pack(splats: &SplatSet) -> Result<PackedBuffer, CoreError> {
    splats.validate_lengths()?;

    let _span = tracing::trace_span!("pack_splats", count = splats.count).entered();

    let n = splats.count as usize;
    let mut records = Vec::with_capacity(n);
    for i in 0..n {
        let position = splats.position(i);
        let scale = splats.scale(i);
        let color = splats.color(i);
        let opacity = splats.opacity(i);
        let [qw, qx, qy, qz] = splats.rotation(i);

        records.push(PackedRecord {
            position,
            scale,
            rgba: [
                encode_unit(color[0]),
                encode_unit(color[1]),
                encode_unit(color[2]),
                encode_unit(opacity),
            ],
            quat: [
                encode_signed(qw),
                encode_signed(qx),
                encode_signed(qy),
                encode_signed(qz),
            ],
        });
    }

    Ok(PackedBuffer { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splat::SceneMetadata;

    fn single_splat() -> SplatSet {
        SplatSet {
            count: 1,
            positions: vec![1.0, 2.0, 3.0],
            scales: vec![0.1, 0.2, 0.3],
            rotations: vec![1.0, 0.0, 0.0, 0.0],
            opacities: vec![1.0],
            colors: vec![1.0, 0.0, 0.0],
            metadata: SceneMetadata::default(),
        }
    }

    #[test]
    fn packs_known_values() {
        let buf = pack(&single_splat()).unwrap();
        assert_eq!(buf.len(), 1);
        let rec = buf.records()[0];
        assert_eq!(rec.position, [1.0, 2.0, 3.0]);
        assert_eq!(rec.scale, [0.1, 0.2, 0.3]);
        assert_eq!(rec.rgba, [255, 0, 0, 255]);
        // w=1 -> 255, x=y=z=0 -> 128
        assert_eq!(rec.quat, [255, 128, 128, 128]);
    }

    #[test]
    fn repacking_identical_input_is_bit_identical() {
        let splats = single_splat();
        let a = pack(&splats).unwrap();
        let b = pack(&splats).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn clamps_out_of_range_values() {
        let mut splats = single_splat();
        splats.colors = vec![2.0, -1.0, 0.5];
        splats.opacities = vec![5.0];
        splats.rotations = vec![2.0, -2.0, 0.0, 0.0];
        let buf = pack(&splats).unwrap();
        let rec = buf.records()[0];
        assert_eq!(rec.rgba, [255, 0, 128, 255]);
        assert_eq!(rec.quat, [255, 0, 128, 128]);
    }

    #[test]
    fn empty_scene_packs_to_empty_buffer() {
        let splats = SplatSet {
            count: 0,
            ..SplatSet::default()
        };
        let buf = pack(&splats).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut splats = single_splat();
        splats.positions.pop();
        assert!(pack(&splats).is_err());
    }
}
