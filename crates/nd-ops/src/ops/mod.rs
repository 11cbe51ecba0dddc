//! Built-in reference operations.
//!
//! These are small CPU kernels that exercise the validation pipeline end to
//! end. They compute through the tensor layer's logical view, so inputs of
//! either memory ordering give the same numbers.

pub mod elementwise;
pub mod identity;
pub mod matmul;

use std::sync::Arc;

use crate::op::DeclarableOp;

pub use elementwise::{Add, Mul, Sub};
pub use identity::Identity;
pub use matmul::MatMul;

/// One instance of every built-in operation.
pub fn builtin() -> Vec<Arc<dyn DeclarableOp>> {
    vec![
        Arc::new(Add::new()),
        Arc::new(Sub::new()),
        Arc::new(Mul::new()),
        Arc::new(MatMul::new()),
        Arc::new(Identity::new()),
    ]
}
