//! # nd
//!
//! Umbrella crate for the nd workspace. Re-exports the tensor layer and the
//! declarable-operation framework so benches and downstream users need a
//! single dependency.
//!
//! ```
//! use nd::core::Tensor;
//! use nd::ops::{Block, OpRegistry, Status};
//!
//! let mut block = Block::new(0)
//!     .with_input(Tensor::from_i64(&[40, 2], &[2]))
//!     .with_input(Tensor::from_i64(&[2, 40], &[2]));
//! let status = OpRegistry::global().execute("add", &mut block).unwrap();
//! assert_eq!(status, Status::Ok);
//! assert_eq!(block.output(0).unwrap().to_i64_vec().unwrap(), vec![42, 42]);
//! ```

pub use nd_core as core;
pub use nd_ops as ops;
