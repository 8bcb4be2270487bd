//! Quaternion → rotation → covariance math.
//!
//! `Sigma6` is the upper triangle of a 3x3 symmetric covariance matrix,
//! stored as `(s00, s01, s02, s11, s12, s22)`.

pub type Sigma6 = (f32, f32, f32, f32, f32, f32);

/// Builds the rotation matrix `R(q)` for unit quaternion `(w, x, y, z)`,
/// returned row-major as `[[r00, r01, r02], [r10, r11, r12], [r20, r21, r22]]`.
pub fn rotation_matrix(w: f32, x: f32, y: f32, z: f32) -> [[f32; 3]; 3] {
    [
        [
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y + w * z),
            2.0 * (x * z - w * y),
        ],
        [
            2.0 * (x * y - w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z + w * x),
        ],
        [
            2.0 * (x * z + w * y),
            2.0 * (y * z - w * x),
            1.0 - 2.0 * (x * x + y * y),
        ],
    ]
}

/// Computes Sigma = M^T M where M is R with row `j` scaled by `scale[j]`,
/// equal to R * diag(scale)^2 * R^T.
pub fn covariance(quat_wxyz: [f32; 4], scale: [f32; 3]) -> Sigma6 {
    let [w, x, y, z] = quat_wxyz;
    let r = rotation_matrix(w, x, y, z);

    let mut m = [[0.0_f32; 3]; 3];
    for j in 0..3 {
        for k in 0..3 {
            m[j][k] = r[j][k] * scale[j];
        }
    }

    let dot_col = |a: usize, b: usize| m[0][a] * m[0][b] + m[1][a] * m[1][b] + m[2][a] * m[2][b];

    (
        dot_col(0, 0),
        dot_col(0, 1),
        dot_col(0, 2),
        dot_col(1, 1),
        dot_col(1, 2),
        dot_col(2, 2),
    )
}
