//! Benchmark: execute() overhead and throughput for the reference ops.

use std::time::Instant;

use nd::core::{DType, Order, Tensor};
use nd::ops::ops::{Add, MatMul};
use nd::ops::{Block, DeclarableOp, Execute, Status};

fn bench(op: &dyn DeclarableOp, block: &mut Block, iters: usize) -> f64 {
    assert_eq!(op.execute(Some(&mut *block)).unwrap(), Status::Ok);
    let start = Instant::now();
    for _ in 0..iters {
        let _ = op.execute(Some(&mut *block)).unwrap();
    }
    start.elapsed().as_secs_f64() / iters as f64
}

fn block_of(shape: &[usize], order: Order, count: usize) -> Block {
    let n: usize = shape.iter().product();
    let values: Vec<f64> = (0..n).map(|i| ((i * 7 + 3) % 13) as f64 * 0.1).collect();
    Block::from_tensors(
        0,
        (0..count).map(|_| Tensor::from_values(&values, shape, DType::F32, order).unwrap()),
    )
}

fn main() {
    println!("=== nd execute() Benchmark ===\n");

    println!("{:<14} {:>12} {:>12} {:>10}", "add len", "C/C (us)", "C/F (us)", "Slowdown");
    println!("{}", "-".repeat(51));
    let add = Add::new();
    for &n in &[1_000usize, 65_536, 1_000_000] {
        let iters = if n <= 65_536 { 500 } else { 20 };
        let same = bench(&add, &mut block_of(&[n], Order::C, 2), iters);

        let mut mixed = block_of(&[n / 100, 100], Order::C, 1);
        let rhs = block_of(&[n / 100, 100], Order::F, 1);
        mixed.push_input(rhs.variables()[0].clone());
        let mixed_s = bench(&add, &mut mixed, iters);

        println!(
            "{:<14} {:>12.1} {:>12.1} {:>9.2}x",
            n,
            same * 1e6,
            mixed_s * 1e6,
            mixed_s / same
        );
    }

    println!("\n{:<14} {:>12}", "matmul", "Time (ms)");
    println!("{}", "-".repeat(27));
    let matmul = MatMul::new();
    for &sz in &[32usize, 128, 256] {
        let iters = if sz <= 128 { 50 } else { 5 };
        let secs = bench(&matmul, &mut block_of(&[sz, sz], Order::C, 2), iters);
        println!("{:<14} {:>12.3}", format!("{sz}x{sz}"), secs * 1e3);
    }
}
