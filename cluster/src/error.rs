use thiserror::Error;

/// Errors returned by clustering operations.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("dimension mismatch for {id}: expected {expected}, got {got}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid similarity threshold {0}: must be in (0, 1]")]
    InvalidThreshold(f32),

    #[error("duplicate photo id: {0}")]
    DuplicateId(String),
}
