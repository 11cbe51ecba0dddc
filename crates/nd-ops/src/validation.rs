//! Structural checks over a block's input variables.
//!
//! Every check borrows the block, looks only at tensor metadata, and returns
//! a [`Status`]. Checks never raise; wrap one in [`require_ok!`](crate::require_ok!)
//! to turn a failure into a hard stop.
//!
//! A block with no input variables passes every check except
//! [`validate_non_empty_input`]. Operations that need inputs must call that
//! check (or [`validate_input_count`]) themselves.

use nd_core::Tensor;

use crate::block::{Block, Variable};
use crate::descriptor::OpDescriptor;
use crate::status::Status;

fn reject(check: &'static str, index: usize, status: Status) -> Status {
    tracing::debug!(check, index, code = status.code(), status = %status, "validation check failed");
    status
}

/// Compare every input tensor against input 0 with `same`.
fn match_reference(
    block: &Block,
    check: &'static str,
    failure: Status,
    same: impl Fn(&Tensor, &Tensor) -> bool,
) -> Status {
    if block.is_empty() {
        return Status::Ok;
    }
    let Some(first) = block.input(0) else {
        return reject(check, 0, Status::BadInput);
    };
    for (i, variable) in block.variables().iter().enumerate() {
        let Some(tensor) = variable.tensor() else {
            return reject(check, i, Status::BadInput);
        };
        if !same(first, tensor) {
            return reject(check, i, failure);
        }
    }
    Status::Ok
}

/// At least one input, and every input holds an allocated tensor.
pub fn validate_non_empty_input(block: &Block) -> Status {
    if block.is_empty() {
        return reject("non_empty_input", 0, Status::BadInput);
    }
    for (i, variable) in block.variables().iter().enumerate() {
        match variable.tensor() {
            Some(t) if t.non_null() => {}
            _ => return reject("non_empty_input", i, Status::BadInput),
        }
    }
    Status::Ok
}

/// Every input tensor has exactly `rank` dimensions.
///
/// A variable without a tensor fails with `BadInput`, whatever the ranks of
/// the others.
pub fn validate_input_dimensions(block: &Block, rank: usize) -> Status {
    if let Some(i) = block.variables().iter().position(|v| v.tensor().is_none()) {
        return reject("input_dimensions", i, Status::BadInput);
    }
    for (i, tensor) in block.variables().iter().filter_map(Variable::tensor).enumerate() {
        if tensor.rank() != rank {
            return reject("input_dimensions", i, Status::BadDimensions);
        }
    }
    Status::Ok
}

pub fn validate_input_2d(block: &Block) -> Status {
    validate_input_dimensions(block, 2)
}

pub fn validate_input_3d(block: &Block) -> Status {
    validate_input_dimensions(block, 3)
}

pub fn validate_input_4d(block: &Block) -> Status {
    validate_input_dimensions(block, 4)
}

/// Every input shares input 0's memory ordering.
pub fn validate_orders_match(block: &Block) -> Status {
    match_reference(block, "orders_match", Status::BadOrder, |a, b| {
        a.ordering() == b.ordering()
    })
}

/// Every input's shape is soft-equal to input 0's.
pub fn validate_input_dimensions_match(block: &Block) -> Status {
    match_reference(block, "dimensions_match", Status::BadDimensions, |a, b| {
        a.shape().equals_soft(b.shape())
    })
}

/// Every input has the same total element count as input 0.
pub fn validate_input_length_match(block: &Block) -> Status {
    match_reference(block, "length_match", Status::BadLength, |a, b| {
        a.length() == b.length()
    })
}

/// Every input has input 0's element type.
pub fn validate_dtypes_match(block: &Block) -> Status {
    match_reference(block, "dtypes_match", Status::BadInput, |a, b| a.dtype() == b.dtype())
}

/// The block supplies at least as many inputs as the descriptor declares.
pub fn validate_input_count(block: &Block, descriptor: &OpDescriptor) -> Status {
    if block.len() < descriptor.num_inputs() {
        tracing::debug!(
            op = descriptor.name(),
            expected = descriptor.num_inputs(),
            got = block.len(),
            "not enough input variables"
        );
        return Status::BadArguments;
    }
    Status::Ok
}
