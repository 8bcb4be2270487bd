use glam::{Quat, Vec3};
use gsplat_render::Camera;

/// The authoritative invariant from the camera contract: after the
/// composite world→clip transform, a splat in front of the camera has
/// `cam.z > 0` and lands within the clip-space bounds `clip.z in [0, clip.w]`.
#[test]
fn splat_in_front_of_camera_satisfies_the_composite_invariant() {
    let camera = Camera::new(
        Vec3::new(0.0, 0.0, 5.0),
        Quat::IDENTITY,
        std::f32::consts::FRAC_PI_3,
        0.1,
        100.0,
    );
    let viewport = (800.0, 600.0);

    let cam = camera.view() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert!(cam.z > 0.0, "splat in front of the camera must have cam.z > 0, got {}", cam.z);

    let clip = camera.projection(viewport) * cam;
    assert!(clip.z >= 0.0 && clip.z <= clip.w, "clip.z = {} must lie in [0, {}]", clip.z, clip.w);
}

#[test]
fn view_proj_columns_are_column_major_and_finite() {
    let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, 1.0, 0.1, 50.0);
    let cols = camera.view_proj_columns((1280.0, 720.0));
    assert_eq!(cols.len(), 16);
    assert!(cols.iter().all(|v| v.is_finite()));
}
