use crate::dtype::DType;

/// Errors raised by the tensor layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("length mismatch: shape {shape:?} needs {expected} elements, got {got}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        got: usize,
    },

    #[error("shape {0:?} has more elements than fit in memory")]
    ShapeOverflow(Vec<usize>),

    #[error("unsupported dtype: {0}")]
    UnsupportedDType(DType),

    #[error("invalid memory order '{0}' (expected 'c' or 'f')")]
    InvalidOrder(char),

    #[error("unknown dtype '{0}'")]
    UnknownDType(String),

    #[error("tensor has no data buffer")]
    Unallocated,
}
