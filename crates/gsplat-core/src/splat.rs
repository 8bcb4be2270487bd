use crate::error::CoreError;

/// Opaque metadata carried alongside a splat set, untouched by the packer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMetadata {
    pub timestamp: f64,
    pub frame_id: u32,
}

/// A normalized splat record set, as produced by the (out-of-scope) parser.
///
/// Arrays are structure-of-arrays, each sized for `count` splats: `positions`
/// and `scales` have `3 * count` elements, `rotations` has `4 * count`
/// (w, x, y, z), `opacities` has `count`, `colors` has `3 * count`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplatSet {
    pub count: u32,
    pub positions: Vec<f32>,
    pub scales: Vec<f32>,
    pub rotations: Vec<f32>,
    pub opacities: Vec<f32>,
    pub colors: Vec<f32>,
    pub metadata: SceneMetadata,
}

impl SplatSet {
    /// Checks that every array is sized consistently with `count`.
    ///
    /// Does not enforce the unit-quaternion / clamped-range invariants from
    /// the data model: those are the parser's contract, not a packer concern.
    pub fn validate_lengths(&self) -> Result<(), CoreError> {
        let n = self.count as usize;
        check_len("positions", self.positions.len(), 3 * n)?;
        check_len("scales", self.scales.len(), 3 * n)?;
        check_len("rotations", self.rotations.len(), 4 * n)?;
        check_len("opacities", self.opacities.len(), n)?;
        check_len("colors", self.colors.len(), 3 * n)?;
        Ok(())
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        let o = 3 * i;
        [self.positions[o], self.positions[o + 1], self.positions[o + 2]]
    }

    pub fn scale(&self, i: usize) -> [f32; 3] {
        let o = 3 * i;
        [self.scales[o], self.scales[o + 1], self.scales[o + 2]]
    }

    /// Returns the quaternion as (w, x, y, z).
    pub fn rotation(&self, i: usize) -> [f32; 4] {
        let o = 4 * i;
        [
            self.rotations[o],
            self.rotations[o + 1],
            self.rotations[o + 2],
            self.rotations[o + 3],
        ]
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        let o = 3 * i;
        [self.colors[o], self.colors[o + 1], self.colors[o + 2]]
    }

    pub fn opacity(&self, i: usize) -> f32 {
        self.opacities[i]
    }
}

fn check_len(name: &'static str, got: usize, expected: usize) -> Result<(), CoreError> {
    if got != expected {
        return Err(CoreError::LengthMismatch {
            name,
            got,
            expected,
        });
    }
    Ok(())
}
