//! Common test utilities
#![allow(dead_code)]

use lusolve::runtime::Runtime;
use lusolve::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Create a CPU client and device for testing
pub fn create_cpu_client() -> (CpuClient, CpuDevice) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    (client, device)
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Seeded RNG so failures reproduce
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random invertible `[n, n]` matrix whose factorization swaps rows
///
/// A diagonally dominant matrix with its rows rotated by a random shift in
/// `1..n`, so partial pivoting never sees the identity order for `n >= 2`.
pub fn random_invertible(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let shift = if n > 1 { rng.random_range(1..n) } else { 0 };
    pivoting_matrix(rng, n, shift)
}

/// Diagonally dominant `[n, n]` matrix with row `i` taken from row `(i + shift) % n`
///
/// The first pivot chosen by partial pivoting is `(n - shift) % n`.
pub fn pivoting_matrix(rng: &mut StdRng, n: usize, shift: usize) -> Vec<f64> {
    let mut dominant: Vec<f64> = (0..n * n).map(|_| rng.random_range(-1.0..1.0)).collect();
    for i in 0..n {
        dominant[i * n + i] += n as f64;
    }
    let mut a = Vec::with_capacity(n * n);
    for i in 0..n {
        let src = (i + shift) % n;
        a.extend_from_slice(&dominant[src * n..(src + 1) * n]);
    }
    a
}

/// Whether LAPACK-style pivots describe any row swap
pub fn pivots_swap_rows(pivots: &[i64]) -> bool {
    pivots.iter().enumerate().any(|(i, &p)| p != i as i64)
}

/// Random row-major `[rows, cols]` data in [-1, 1)
pub fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Vec<f64> {
    (0..rows * cols).map(|_| rng.random_range(-1.0..1.0)).collect()
}

/// Row-major `[m, k] @ [k, n]` on the host
pub fn matmul_f64(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    for i in 0..m {
        for p in 0..k {
            let aip = a[i * k + p];
            for j in 0..n {
                out[i * n + j] += aip * b[p * n + j];
            }
        }
    }
    out
}

/// Transpose of a row-major `[m, n]` matrix
pub fn transpose_f64(a: &[f64], m: usize, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * n];
    for i in 0..m {
        for j in 0..n {
            out[j * m + i] = a[i * n + j];
        }
    }
    out
}
