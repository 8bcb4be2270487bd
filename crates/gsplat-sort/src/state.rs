use gsplat_core::PackedBuffer;

/// The worker's local state after a scene load: the packed buffer plus the
/// two scalar views needed for sorting.
pub struct SceneState {
    pub buffer: PackedBuffer,
    /// Flattened `[x, y, z, ...]` float view of the packed positions.
    pub positions: Vec<f32>,
    /// Byte view of the packed RGBA alpha channel, for the cull test.
    pub alphas: Vec<u8>,
}

impl SceneState {
    pub fn from_buffer(buffer: PackedBuffer) -> Self {
        let positions = buffer
            .records()
            .iter()
            .flat_map(|r| r.position)
            .collect();
        let alphas = buffer.records().iter().map(|r| r.rgba[3]).collect();
        Self {
            buffer,
            positions,
            alphas,
        }
    }

    pub fn count(&self) -> u32 {
        self.buffer.len() as u32
    }
}

/// Throttle and cutoff scalars, the worker's other piece of local state.
pub struct ThrottleState {
    last_view_dir: Option<[f32; 3]>,
    alpha_cutoff: u8,
}

impl Default for ThrottleState {
    fn default() -> Self {
        // Alpha cutoff defaults to 1, keeping all non-zero-opacity splats.
        Self {
            last_view_dir: None,
            alpha_cutoff: 1,
        }
    }
}

impl ThrottleState {
    pub fn alpha_cutoff(&self) -> u8 {
        self.alpha_cutoff
    }

    /// Updates the cutoff and invalidates the throttle, forcing the next
    /// sort to run regardless of view similarity. Clamped to the documented
    /// `[1, 255]` range: 0 is outside the contract (a value of 1 already
    /// keeps all non-zero-opacity splats), so it is raised to 1 rather than
    /// silently admitting fully-transparent splats into the sort.
    pub fn set_alpha(&mut self, cutoff: u8) {
        self.alpha_cutoff = cutoff.max(1);
        self.last_view_dir = None;
    }

    /// Returns `true` if a sort for this `view_proj` should run, updating
    /// the stored view direction as a side effect when it does.
    pub fn should_sort(&mut self, view_proj: &[f32; 16]) -> bool {
        let v = [view_proj[2], view_proj[6], view_proj[10]];
        if let Some(prev) = self.last_view_dir {
            let dot = v[0] * prev[0] + v[1] * prev[1] + v[2] * prev[2];
            if (dot - 1.0).abs() < 0.01 {
                return false;
            }
        }
        self.last_view_dir = Some(v);
        true
    }
}
