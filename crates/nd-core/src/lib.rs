//! # nd-core
//!
//! Tensor layer consumed by the nd operation framework.
//!
//! Provides the `Tensor` type with:
//! - Rank, shape and total length queries
//! - Memory ordering (`'c'` row-major, `'f'` column-major)
//! - Shared, copy-on-write CPU storage for f32/f64/i32/i64
//! - Placeholder tensors that carry metadata but no data buffer

pub mod dtype;
pub mod error;
pub mod order;
pub mod shape;
pub mod storage;
pub mod tensor;

pub use dtype::DType;
pub use error::CoreError;
pub use order::Order;
pub use shape::Shape;
pub use storage::Storage;
pub use tensor::Tensor;

pub type Result<T> = std::result::Result<T, CoreError>;
