//! End-to-end behaviour of the execute contract, the validation pipeline and
//! the built-in operations.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use nd_core::{DType, Order, Tensor};
use nd_ops::ops::{Add, MatMul};
use nd_ops::validation::*;
use nd_ops::{
    require_ok, Block, DeclarableOp, Execute, OpDescriptor, OpError, OpRegistry, RunConfig,
    Status, Variable,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("nd_ops=debug")
        .with_test_writer()
        .try_init();
}

fn filled(shape: &[usize], order: Order) -> Tensor {
    let n: usize = shape.iter().product();
    let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
    Tensor::from_values(&values, shape, DType::F32, order).unwrap()
}

// ============================================================================
// execute()
// ============================================================================

#[test]
fn test_execute_without_block_is_fatal() {
    let ops: Vec<Arc<dyn DeclarableOp>> = nd_ops::ops::builtin();
    for op in ops {
        let outcome = catch_unwind(AssertUnwindSafe(|| op.execute(None)));
        assert!(outcome.is_err(), "{} accepted a missing block", op.op_name());
    }
}

#[test]
fn test_shared_op_across_threads() {
    let op = Arc::new(Add::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let op = Arc::clone(&op);
            thread::spawn(move || {
                let v = i as f32;
                let mut block = Block::new(i)
                    .with_input(Tensor::from_f32(&[v, v], &[2]))
                    .with_input(Tensor::from_f32(&[1.0, 1.0], &[2]));
                let status = op.execute(Some(&mut block)).unwrap();
                (status, block.output(0).unwrap().as_f32_slice().unwrap().to_vec())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (status, out) = handle.join().unwrap();
        assert_eq!(status, Status::Ok);
        assert_eq!(out, vec![i as f32 + 1.0; 2]);
    }
}

// ============================================================================
// Validation pipeline
// ============================================================================

#[test]
fn test_zero_variable_block() {
    let block = Block::new(0);
    assert_eq!(validate_orders_match(&block), Status::Ok);
    assert_eq!(validate_input_dimensions_match(&block), Status::Ok);
    assert_eq!(validate_input_length_match(&block), Status::Ok);
    assert_eq!(validate_input_2d(&block), Status::Ok);
    assert_eq!(validate_non_empty_input(&block), Status::BadInput);
}

#[test]
fn test_shape_and_order_checks() {
    let same = Block::new(0)
        .with_input(filled(&[2, 3], Order::C))
        .with_input(filled(&[2, 3], Order::C));
    assert_eq!(validate_input_dimensions_match(&same), Status::Ok);
    assert_eq!(validate_orders_match(&same), Status::Ok);

    let swapped = Block::new(0)
        .with_input(filled(&[2, 3], Order::C))
        .with_input(filled(&[3, 2], Order::C));
    assert_eq!(validate_input_dimensions_match(&swapped), Status::BadDimensions);

    let mixed = Block::new(0)
        .with_input(filled(&[2, 3], Order::C))
        .with_input(filled(&[2, 3], Order::F));
    assert_eq!(validate_orders_match(&mixed), Status::BadOrder);
}

#[test]
fn test_rank_check_missing_tensor_wins() {
    let block = Block::new(0)
        .with_input(filled(&[2, 2], Order::C))
        .with_input(filled(&[2, 2, 2], Order::C))
        .with_input(Variable::empty(2));
    assert_eq!(validate_input_dimensions(&block, 2), Status::BadInput);

    let block = Block::new(0)
        .with_input(filled(&[2, 2], Order::C))
        .with_input(filled(&[2, 2, 2], Order::C));
    assert_eq!(validate_input_dimensions(&block, 2), Status::BadDimensions);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_length_check_on_huge_placeholders() {
    let huge = |dims: &[usize]| Tensor::placeholder(dims, DType::F32, Order::C);
    let block = Block::new(0)
        .with_input(huge(&[1 << 32, (1 << 32) + 1]))
        .with_input(huge(&[1 << 32, (1 << 32) + 1]));
    assert_eq!(validate_input_length_match(&block), Status::Ok);

    let block = Block::new(0)
        .with_input(huge(&[1 << 32, (1 << 32) + 1]))
        .with_input(huge(&[4]));
    assert_eq!(validate_input_length_match(&block), Status::BadLength);
}

#[test]
fn test_guard_is_noop_on_ok_and_repeatable() {
    for _ in 0..3 {
        assert!(require_ok(Status::Ok, "ok").is_ok());
    }
    let first = require_ok(Status::BadShape, "shape").unwrap_err();
    let second = require_ok(Status::BadShape, "shape").unwrap_err();
    assert_eq!(first.status(), second.status());
    assert_eq!(first.status().code(), 2);
}

// ============================================================================
// Reference operations
// ============================================================================

#[test]
fn test_add_matching_lengths() {
    let mut block = Block::new(0)
        .with_input(filled(&[6], Order::C))
        .with_input(filled(&[6], Order::C));
    assert_eq!(Add::new().execute(Some(&mut block)).unwrap(), Status::Ok);
    assert_eq!(block.output(0).unwrap().length(), 6);
}

#[test]
fn test_add_length_mismatch_leaves_output_alone() {
    init_tracing();
    let mut block = Block::new(0)
        .with_input(filled(&[6], Order::C))
        .with_input(filled(&[5], Order::C));
    assert_eq!(Add::new().execute(Some(&mut block)).unwrap(), Status::BadLength);
    assert!(block.output(0).is_none());
    assert_eq!(block.num_outputs(), 0);
}

#[test]
fn test_guard_fault_surfaces_as_error() {
    init_tracing();
    let mut block = Block::new(0).with_input(filled(&[2, 2, 2], Order::C)).with_input(filled(
        &[2, 2],
        Order::C,
    ));
    match MatMul::new().execute(Some(&mut block)) {
        Err(OpError::Guard(fault)) => {
            assert_eq!(fault.status(), Status::BadDimensions);
            assert!(fault.site().expr().contains("validate_input_2d"));
            assert!(fault.to_string().contains("code=32"));
        }
        other => panic!("expected a guard fault, got {other:?}"),
    }
}

#[test]
fn test_descriptor_from_untrusted_counts() {
    assert!(OpDescriptor::try_new("add", 2, 1).is_ok());
    assert!(matches!(
        OpDescriptor::try_new("add", -1, 1),
        Err(OpError::NegativeCount { which: "input", .. })
    ));
    assert!(matches!(OpDescriptor::try_new("", 1, 1), Err(OpError::EmptyName)));
}

// ============================================================================
// Registry + configuration
// ============================================================================

#[test]
fn test_config_round_into_add() {
    let json = r#"{
        "op": "add",
        "block_id": 9,
        "inputs": [
            {"shape": [2, 3], "data": [1, 2, 3, 4, 5, 6]},
            {"shape": [2, 3], "order": "f", "data": [10, 20, 30, 40, 50, 60]}
        ]
    }"#;
    let config = RunConfig::from_json_str(json).unwrap();
    let mut block = config.to_block().unwrap();
    let status = OpRegistry::global().execute(&config.op, &mut block).unwrap();
    assert_eq!(status, Status::Ok);

    let out = block.output(0).unwrap();
    assert_eq!(out.shape().dims(), &[2, 3]);
    assert_eq!(out.to_f64_vec().unwrap(), vec![11.0, 22.0, 33.0, 44.0, 55.0, 66.0]);
}

#[test]
fn test_config_with_missing_tensor() {
    let json = r#"{"op": "add", "inputs": [{"shape": [2], "data": [1, 2]}, {"shape": [2]}]}"#;
    let config = RunConfig::from_json_str(json).unwrap();
    let mut block = config.to_block().unwrap();
    let err = OpRegistry::global().execute("add", &mut block).unwrap_err();
    assert!(matches!(err, OpError::Guard(ref f) if f.status() == Status::BadInput));
}
