use nd_core::CoreError;

use crate::guard::GuardFault;

/// Errors raised by the operation framework.
///
/// Recoverable data problems are not errors: they travel as a
/// [`Status`](crate::Status) inside `Ok`. Everything here stops the current
/// operation.
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    /// A `require_ok` guard saw a non-OK status.
    #[error(transparent)]
    Guard(#[from] GuardFault),

    /// The tensor layer failed while the kernel was running.
    #[error("tensor error: {0}")]
    Core(#[from] CoreError),

    #[error("operation name must not be empty")]
    EmptyName,

    #[error("operation '{op}' declares a negative {which} count ({count})")]
    NegativeCount {
        op: String,
        which: &'static str,
        count: i64,
    },

    #[error("operation '{0}' is already registered")]
    DuplicateOp(String),

    #[error("unknown operation '{0}'")]
    UnknownOp(String),

    #[error("invalid run configuration: {0}")]
    Config(String),

    #[error("failed to read run configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse run configuration: {0}")]
    Json(#[from] serde_json::Error),
}
