use thiserror::Error;

/// Errors raised while packing, validating, or texturing a splat set.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("array length mismatch: {name} has {got} elements, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("all {count} splats produced non-finite covariance; scene load cannot proceed")]
    AllCovariancesDegenerate { count: usize },
}
