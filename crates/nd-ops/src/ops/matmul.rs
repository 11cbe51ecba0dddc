//! 2-D matrix product: `[m, k] x [k, n] -> [m, n]`.

use nd_core::{CoreError, Tensor};
use rayon::prelude::*;

use crate::status::Status;
use crate::validation::{
    validate_dtypes_match, validate_input_2d, validate_input_count, validate_non_empty_input,
};

/// Output rows are computed in parallel once `m * n * k` reaches this.
const PARALLEL_WORK: usize = 1 << 18;

crate::declare_op! {
    /// Matrix product of inputs 0 and 1.
    ///
    /// Both inputs must be rank 2. An inner-dimension mismatch is reported as
    /// `BadDimensions` without writing an output. The result takes input 0's
    /// dtype and ordering.
    pub struct MatMul("matmul", inputs = 2, outputs = 1);

    fn validate_and_execute(&self, block) {
        crate::require_ok!(validate_input_count(block, self.descriptor()));
        crate::require_ok!(validate_non_empty_input(block));
        crate::require_ok!(validate_input_2d(block));

        let status = validate_dtypes_match(block);
        if !status.is_ok() {
            return Ok(status);
        }

        let (a, b) = match (block.input(0), block.input(1)) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(CoreError::Unallocated.into()),
        };
        let (m, k) = (a.shape().dims()[0], a.shape().dims()[1]);
        let (k2, n) = (b.shape().dims()[0], b.shape().dims()[1]);
        if k != k2 {
            tracing::debug!(m, k, k2, n, "matmul inner dimensions differ");
            return Ok(Status::BadDimensions);
        }

        let out = matmul_2d(a, b, m, k, n)?;
        block.set_output(0, out);
        Ok(Status::Ok)
    }
}

fn matmul_2d(a: &Tensor, b: &Tensor, m: usize, k: usize, n: usize) -> nd_core::Result<Tensor> {
    if a.dtype().is_integer() {
        let out = product(&a.to_i64_vec()?, &b.to_i64_vec()?, m, k, n, |acc, x, y| {
            acc.wrapping_add(x.wrapping_mul(y))
        });
        return Tensor::from_i64_values(&out, &[m, n], a.dtype(), a.ordering());
    }
    let out = product(&a.to_f64_vec()?, &b.to_f64_vec()?, m, k, n, |acc, x, y| acc + x * y);
    Tensor::from_values(&out, &[m, n], a.dtype(), a.ordering())
}

/// Row-major i-p-j product over logical buffers.
fn product<T>(
    lhs: &[T],
    rhs: &[T],
    m: usize,
    k: usize,
    n: usize,
    mac: impl Fn(T, T, T) -> T + Sync + Send,
) -> Vec<T>
where
    T: Copy + Default + Send + Sync,
{
    let mut out = vec![T::default(); m * n];

    let row = |(i, out_row): (usize, &mut [T])| {
        let a_row = &lhs[i * k..(i + 1) * k];
        for (p, &a_ip) in a_row.iter().enumerate() {
            let b_row = &rhs[p * n..(p + 1) * n];
            for (o, &b_pj) in out_row.iter_mut().zip(b_row) {
                *o = mac(*o, a_ip, b_pj);
            }
        }
    };

    if n > 0 && m.saturating_mul(n).saturating_mul(k) >= PARALLEL_WORK {
        out.par_chunks_mut(n).enumerate().for_each(row);
    } else if n > 0 {
        out.chunks_mut(n).enumerate().for_each(row);
    }
    out
}
