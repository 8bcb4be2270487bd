use glam::{Mat4, Quat, Vec3};

/// A perspective camera expressed in the OpenGL convention (looks along
/// −z in its own local frame). `view_proj` applies the axis flips and
/// sign conventions the rasterization stage expects; callers never need
/// to reason about those directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    pub fov_y: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(position: Vec3, rotation: Quat, fov_y: f32, znear: f32, zfar: f32) -> Self {
        Self {
            position,
            rotation,
            fov_y,
            znear,
            zfar,
        }
    }

    /// Focal length in pixels, `fx = fy = (h/2)*cot(fov/2)`.
    pub fn focal(&self, viewport: (f32, f32)) -> (f32, f32) {
        let f = (viewport.1 * 0.5) / (self.fov_y * 0.5).tan();
        (f, f)
    }

    /// World→camera, OpenGL convention (camera looks along −z).
    fn view_gl(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// World→camera with the y-row and z-row flipped, so a splat in front
    /// of the camera ends up at positive `cam.z`, matching the sign
    /// conventions baked into the covariance projection.
    pub fn view(&self) -> Mat4 {
        let flip_yz = Mat4::from_cols(
            [1.0, 0.0, 0.0, 0.0].into(),
            [0.0, -1.0, 0.0, 0.0].into(),
            [0.0, 0.0, -1.0, 0.0].into(),
            [0.0, 0.0, 0.0, 1.0].into(),
        );
        flip_yz * self.view_gl()
    }

    /// Camera→clip, negated x-scale / positive y-scale, matching `view`'s flip.
    pub fn projection(&self, viewport: (f32, f32)) -> Mat4 {
        let (w, h) = viewport;
        let (fx, fy) = self.focal(viewport);
        let (znear, zfar) = (self.znear, self.zfar);
        Mat4::from_cols(
            [-(2.0 * fx / w), 0.0, 0.0, 0.0].into(),
            [0.0, 2.0 * fy / h, 0.0, 0.0].into(),
            [0.0, 0.0, zfar / (zfar - znear), 1.0].into(),
            [0.0, 0.0, -(zfar * znear) / (zfar - znear), 0.0].into(),
        )
    }

    /// Composite world→clip matrix, column-major, as the flattened 16
    /// floats the sort worker and vertex shader both expect.
    pub fn view_proj(&self, viewport: (f32, f32)) -> Mat4 {
        self.projection(viewport) * self.view()
    }

    pub fn view_proj_columns(&self, viewport: (f32, f32)) -> [f32; 16] {
        self.view_proj(viewport).to_cols_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn splat_in_front_of_camera_has_positive_cam_z() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 5.0), Quat::IDENTITY, FRAC_PI_2, 0.1, 100.0);
        let view = cam.view();
        let p = view * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(p.z > 0.0, "expected positive cam.z, got {}", p.z);
    }

    #[test]
    fn view_proj_row_two_entries_sit_at_the_wire_format_indices() {
        let cam = Camera::new(Vec3::ZERO, Quat::IDENTITY, FRAC_PI_2, 0.1, 100.0);
        let cols = cam.view_proj_columns((800.0, 600.0));
        let m = cam.view_proj((800.0, 600.0));
        assert_approx_eq!(cols[2] as f64, m.x_axis.z as f64, 1e-6);
        assert_approx_eq!(cols[6] as f64, m.y_axis.z as f64, 1e-6);
        assert_approx_eq!(cols[10] as f64, m.z_axis.z as f64, 1e-6);
        assert_approx_eq!(cols[14] as f64, m.w_axis.z as f64, 1e-6);
    }

    #[test]
    fn projection_matches_spec_layout_for_square_viewport() {
        let cam = Camera::new(Vec3::ZERO, Quat::IDENTITY, FRAC_PI_2, 1.0, 10.0);
        let p = cam.projection((100.0, 100.0));
        let (fx, fy) = cam.focal((100.0, 100.0));
        assert_approx_eq!(p.x_axis.x as f64, (-(2.0 * fx / 100.0)) as f64, 1e-5);
        assert_approx_eq!(p.y_axis.y as f64, (2.0 * fy / 100.0) as f64, 1e-5);
        assert_approx_eq!(p.z_axis.w as f64, 1.0, 1e-6);
    }
}
