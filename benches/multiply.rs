#![allow(dead_code)]

use fluxbench::{Bencher, flux};
use std::hint::black_box;

use dense_linalg::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn filled(size: usize, seed: usize, kind: StorageKind) -> RealMatrix {
    let data = (0..size * size)
        .map(|i| ((i * 17 + seed * 31 + 3) % 1000) as f64 / 1000.0)
        .collect();
    RealMatrix::from_row_major_with_storage(size, size, data, kind).unwrap()
}

// ---------------------------------------------------------------------------
// Multiply by layout (parameterized)
// ---------------------------------------------------------------------------

#[flux::bench(group = "multiply_simple", args = [32, 64, 128, 256])]
fn simple_multiply(b: &mut Bencher, size: usize) {
    let a = filled(size, 1, StorageKind::Simple);
    let bm = filled(size, 2, StorageKind::Simple);
    b.iter(|| black_box(a.multiply(&bm).unwrap()));
}

#[flux::bench(group = "multiply_blocked", args = [32, 64, 128, 256])]
fn blocked_multiply(b: &mut Bencher, size: usize) {
    let a = filled(size, 1, StorageKind::Blocked);
    let bm = filled(size, 2, StorageKind::Blocked);
    b.iter(|| black_box(a.multiply(&bm).unwrap()));
}

// ---------------------------------------------------------------------------
// Matrix-vector
// ---------------------------------------------------------------------------

#[flux::bench(group = "operate", args = [128, 512])]
fn operate(b: &mut Bencher, size: usize) {
    let a = filled(size, 1, StorageKind::for_shape(size, size));
    let x: Vec<f64> = (0..size).map(|i| i as f64 / size as f64).collect();
    b.iter(|| black_box(a.operate(&x).unwrap()));
}

#[flux::bench(group = "transpose", args = [128, 512])]
fn transpose(b: &mut Bencher, size: usize) {
    let a = filled(size, 1, StorageKind::for_shape(size, size));
    b.iter(|| black_box(a.transpose()));
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

#[flux::compare(
    id = "multiply_256",
    title = "Multiply 256×256 (simple vs blocked)",
    benchmarks = ["simple_multiply@256", "blocked_multiply@256"],
    baseline = "simple_multiply@256",
    metric = "mean"
)]
struct Multiply256;

#[flux::compare(id = "scale_64", title = "Blocked Multiply Scaling", benchmarks = ["blocked_multiply@64"], group = "multiply_scaling", x = "64")]
struct Scale64;

#[flux::compare(id = "scale_128", title = "Blocked Multiply Scaling", benchmarks = ["blocked_multiply@128"], group = "multiply_scaling", x = "128")]
struct Scale128;

#[flux::compare(id = "scale_256", title = "Blocked Multiply Scaling", benchmarks = ["blocked_multiply@256"], group = "multiply_scaling", x = "256")]
struct Scale256;

#[flux::synthetic(
    id = "blocked_speedup_256",
    formula = "simple_multiply@256 / blocked_multiply@256",
    unit = "x"
)]
struct BlockedSpeedup256;

fn main() {
    fluxbench::run().unwrap();
}
