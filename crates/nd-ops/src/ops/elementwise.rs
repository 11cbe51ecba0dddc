//! Element-wise arithmetic over all inputs: `out = in0 ∘ in1 ∘ … ∘ inN`.
//!
//! The output takes input 0's shape, dtype and ordering. Float inputs are
//! combined in f64; integer inputs use wrapping arithmetic at their own width.

use nd_core::{CoreError, DType, Tensor};
use rayon::prelude::*;

use crate::block::Block;
use crate::status::Status;
use crate::validation::{
    validate_dtypes_match, validate_input_count, validate_input_dimensions_match,
    validate_input_length_match, validate_non_empty_input, validate_orders_match,
};
use crate::Result;

/// Inputs at least this long are combined on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 1 << 16;

crate::declare_op! {
    /// Element-wise sum. Inputs only need matching lengths; a `[2, 3]` and a
    /// `[6]` input add position by position.
    pub struct Add("add", inputs = 2, outputs = 1);

    fn validate_and_execute(&self, block) {
        crate::require_ok!(validate_input_count(block, self.descriptor()));
        crate::require_ok!(validate_non_empty_input(block));

        let status = validate_input_length_match(block).and_then(|| validate_dtypes_match(block));
        if !status.is_ok() {
            return Ok(status);
        }

        let out = fold_inputs(block, Arith::Add)?;
        block.set_output(0, out);
        Ok(Status::Ok)
    }
}

crate::declare_op! {
    /// Element-wise difference. Shapes and orderings must match exactly.
    pub struct Sub("subtract", inputs = 2, outputs = 1);

    fn validate_and_execute(&self, block) {
        crate::require_ok!(validate_input_count(block, self.descriptor()));
        crate::require_ok!(validate_non_empty_input(block));
        crate::require_ok!(validate_input_dimensions_match(block));
        crate::require_ok!(validate_orders_match(block));

        let status = validate_dtypes_match(block);
        if !status.is_ok() {
            return Ok(status);
        }

        let out = fold_inputs(block, Arith::Sub)?;
        block.set_output(0, out);
        Ok(Status::Ok)
    }
}

crate::declare_op! {
    /// Element-wise product. Shapes and orderings must match exactly.
    pub struct Mul("multiply", inputs = 2, outputs = 1);

    fn validate_and_execute(&self, block) {
        crate::require_ok!(validate_input_count(block, self.descriptor()));
        crate::require_ok!(validate_non_empty_input(block));
        crate::require_ok!(validate_input_dimensions_match(block));
        crate::require_ok!(validate_orders_match(block));

        let status = validate_dtypes_match(block);
        if !status.is_ok() {
            return Ok(status);
        }

        let out = fold_inputs(block, Arith::Mul)?;
        block.set_output(0, out);
        Ok(Status::Ok)
    }
}

#[derive(Debug, Clone, Copy)]
enum Arith {
    Add,
    Sub,
    Mul,
}

impl Arith {
    fn float(self, a: f64, b: f64) -> f64 {
        match self {
            Arith::Add => a + b,
            Arith::Sub => a - b,
            Arith::Mul => a * b,
        }
    }

    /// Wrapping, so i32 results truncated from i64 match i32 wrapping math.
    fn int(self, a: i64, b: i64) -> i64 {
        match self {
            Arith::Add => a.wrapping_add(b),
            Arith::Sub => a.wrapping_sub(b),
            Arith::Mul => a.wrapping_mul(b),
        }
    }
}

fn input(block: &Block, index: usize) -> Result<&Tensor> {
    Ok(block.input(index).ok_or(CoreError::Unallocated)?)
}

/// Combine every input into one tensor shaped like input 0.
///
/// Callers must have checked lengths and dtypes already.
fn fold_inputs(block: &Block, op: Arith) -> Result<Tensor> {
    let first = input(block, 0)?;
    let (dims, dtype, order) = (first.shape().dims(), first.dtype(), first.ordering());

    if dtype.is_integer() {
        let mut acc = first.to_i64_vec()?;
        for index in 1..block.len() {
            let rhs = input(block, index)?.to_i64_vec()?;
            combine(&mut acc, &rhs, |a, b| op.int(a, b));
        }
        return Ok(Tensor::from_i64_values(&acc, dims, dtype, order)?);
    }

    if let Some(out) = fold_f32_same_layout(block, first, op) {
        return Ok(out);
    }

    let mut acc = first.to_f64_vec()?;
    for index in 1..block.len() {
        let rhs = input(block, index)?.to_f64_vec()?;
        combine(&mut acc, &rhs, |a, b| op.float(a, b));
    }
    Ok(Tensor::from_values(&acc, dims, dtype, order)?)
}

/// Fast path: every input is f32 with input 0's exact shape and ordering,
/// so buffers line up without any index remapping.
fn fold_f32_same_layout(block: &Block, first: &Tensor, op: Arith) -> Option<Tensor> {
    let same_layout = block.variables().iter().all(|v| {
        v.tensor().is_some_and(|t| {
            t.dtype() == DType::F32 && t.ordering() == first.ordering() && t.shape() == first.shape()
        })
    });
    if !same_layout {
        return None;
    }

    let mut out = first.clone();
    for index in 1..block.len() {
        let rhs = block.input(index)?.as_f32_slice()?;
        let acc = out.as_f32_slice_mut()?;
        combine(acc, rhs, |a, b| op.float(a as f64, b as f64) as f32);
    }
    Some(out)
}

fn combine<T: Copy + Send + Sync>(acc: &mut [T], rhs: &[T], op: impl Fn(T, T) -> T + Sync + Send) {
    let apply = |(x, &y): (&mut T, &T)| *x = op(*x, y);
    if acc.len() >= PARALLEL_THRESHOLD {
        acc.par_iter_mut().zip(rhs.par_iter()).for_each(apply);
    } else {
        acc.iter_mut().zip(rhs.iter()).for_each(apply);
    }
}
