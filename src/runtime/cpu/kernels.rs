//! Typed CPU kernels on row-major host slices
//!
//! Kernels take plain slices and dimensions; tensor handling, dtype dispatch
//! and batching live in the callers.

use crate::algorithm::linalg::TransposeMode;
use crate::dtype::LinalgElement;
use crate::error::{Error, Result};

/// In-place LU factorization with partial pivoting of a row-major `[m, n]` matrix
///
/// `pivots` must hold `min(m, n)` entries. Returns the first step whose pivot
/// was exactly zero, if any; elimination skips that column.
pub fn lu_factor_kernel<T: LinalgElement>(
    a: &mut [T],
    pivots: &mut [i64],
    m: usize,
    n: usize,
) -> Option<usize> {
    let k = m.min(n);
    let mut first_zero = None;

    for col in 0..k {
        // Find pivot: max magnitude in column col, rows col..m
        let mut pivot_row = col;
        let mut max_val = a[col * n + col].magnitude();
        for row in (col + 1)..m {
            let val = a[row * n + col].magnitude();
            if val > max_val {
                max_val = val;
                pivot_row = row;
            }
        }

        pivots[col] = pivot_row as i64;
        if pivot_row != col {
            for j in 0..n {
                a.swap(col * n + j, pivot_row * n + j);
            }
        }

        let pivot = a[col * n + col];
        if pivot.is_zero() {
            if first_zero.is_none() {
                first_zero = Some(col);
            }
            continue;
        }

        // Multipliers (L column)
        for row in (col + 1)..m {
            a[row * n + col] = a[row * n + col] / pivot;
        }

        // Trailing submatrix update
        for row in (col + 1)..m {
            let multiplier = a[row * n + col];
            if multiplier.is_zero() {
                continue;
            }
            for j in (col + 1)..n {
                a[row * n + j] = a[row * n + j] - multiplier * a[col * n + j];
            }
        }
    }

    first_zero
}

/// In-place solve of `op(A) X = B` for triangular `a` `[m, m]` and `x` `[m, p]`
///
/// Only the triangle selected by `lower` is read, and with `unit_diagonal`
/// the diagonal is not read either. This makes the kernel usable on the two
/// halves of a packed LU matrix.
pub fn triangular_solve_kernel<T: LinalgElement>(
    a: &[T],
    x: &mut [T],
    m: usize,
    p: usize,
    lower: bool,
    unit_diagonal: bool,
    trans: TransposeMode,
) -> Result<()> {
    let at = |i: usize, j: usize| -> T {
        match trans {
            TransposeMode::NoTranspose => a[i * m + j],
            TransposeMode::Transpose => a[j * m + i],
            TransposeMode::ConjugateTranspose => a[j * m + i].conj_val(),
        }
    };

    // op(A) is lower triangular exactly when one of lower/transposed holds
    if lower != trans.is_transposed() {
        for i in 0..m {
            eliminate_row(x, i, 0..i, p, &at, unit_diagonal)?;
        }
    } else {
        for i in (0..m).rev() {
            eliminate_row(x, i, (i + 1)..m, p, &at, unit_diagonal)?;
        }
    }
    Ok(())
}

/// `x[i, :] = (x[i, :] - sum_j op(A)[i, j] x[j, :]) / op(A)[i, i]`
#[inline]
fn eliminate_row<T: LinalgElement>(
    x: &mut [T],
    i: usize,
    solved: std::ops::Range<usize>,
    p: usize,
    at: &impl Fn(usize, usize) -> T,
    unit_diagonal: bool,
) -> Result<()> {
    for j in solved {
        let coef = at(i, j);
        if coef.is_zero() {
            continue;
        }
        for c in 0..p {
            x[i * p + c] = x[i * p + c] - coef * x[j * p + c];
        }
    }
    if !unit_diagonal {
        let diag = at(i, i);
        if diag.is_zero() {
            return Err(Error::SingularMatrix { step: i });
        }
        for c in 0..p {
            x[i * p + c] = x[i * p + c] / diag;
        }
    }
    Ok(())
}

/// In-place solve with a packed LU matrix `[m, m]` for `x` `[m, p]`
///
/// - `NoTranspose`: `L U X = B`, L forward (unit) then U backward
/// - `Transpose`/`ConjugateTranspose`: `Uᵀ Lᵀ X = B`, Uᵀ forward then Lᵀ
///   backward (unit), conjugated for `ConjugateTranspose`
///
/// No row permutation is applied here.
pub fn lu_solve_kernel<T: LinalgElement>(
    lu: &[T],
    x: &mut [T],
    m: usize,
    p: usize,
    trans: TransposeMode,
) -> Result<()> {
    match trans {
        TransposeMode::NoTranspose => {
            triangular_solve_kernel(lu, x, m, p, true, true, trans)?;
            triangular_solve_kernel(lu, x, m, p, false, false, trans)
        }
        TransposeMode::Transpose | TransposeMode::ConjugateTranspose => {
            triangular_solve_kernel(lu, x, m, p, false, false, trans)?;
            triangular_solve_kernel(lu, x, m, p, true, true, trans)
        }
    }
}

/// Scatter rows of `src` `[m, p]` through a permutation: `out[perm[i], :] = src[i, :]`
pub fn scatter_rows<T: Copy>(src: &[T], perm: &[i64], p: usize) -> Result<Vec<T>> {
    let m = perm.len();
    let mut out = src.to_vec();
    for (i, &dst) in perm.iter().enumerate() {
        if dst < 0 || dst as usize >= m {
            return Err(Error::IndexOutOfBounds { index: dst, size: m });
        }
        let dst = dst as usize;
        out[dst * p..(dst + 1) * p].copy_from_slice(&src[i * p..(i + 1) * p]);
    }
    Ok(out)
}

/// Gather slices along one axis of a contiguous buffer, dtype-agnostic
///
/// The source is viewed as `[outer, dim_size, inner]` elements of
/// `elem_size` bytes; the result is `[outer, indices.len(), inner]`.
pub fn gather_bytes(
    src: &[u8],
    elem_size: usize,
    outer: usize,
    dim_size: usize,
    inner: usize,
    indices: &[i64],
) -> Result<Vec<u8>> {
    let block = inner * elem_size;
    let mut out = Vec::with_capacity(outer * indices.len() * block);
    for o in 0..outer {
        for &idx in indices {
            if idx < 0 || idx as usize >= dim_size {
                return Err(Error::IndexOutOfBounds {
                    index: idx,
                    size: dim_size,
                });
            }
            let start = (o * dim_size + idx as usize) * block;
            out.extend_from_slice(&src[start..start + block]);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Complex128;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-10, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_lu_factor_pivots() {
        let mut a = vec![
            2.0, 5.0, 8.0, 7.0, //
            5.0, 2.0, 2.0, 8.0, //
            7.0, 5.0, 6.0, 6.0, //
            5.0, 4.0, 4.0, 8.0,
        ];
        let mut pivots = vec![0; 4];
        assert_eq!(lu_factor_kernel(&mut a, &mut pivots, 4, 4), None);
        assert_eq!(pivots, vec![2, 2, 3, 3]);
        // First row of U is the pivot row [7, 5, 6, 6]
        assert_close(&a[..4], &[7.0, 5.0, 6.0, 6.0]);
    }

    #[test]
    fn test_lu_factor_singular_reports_step() {
        let mut a = vec![1.0, 2.0, 2.0, 4.0];
        let mut pivots = vec![0; 2];
        assert_eq!(lu_factor_kernel(&mut a, &mut pivots, 2, 2), Some(1));
    }

    #[test]
    fn test_triangular_lower_and_upper() {
        // L = [[2, 0], [1, 4]], U = Lᵀ
        let l = [2.0, 0.0, 1.0, 4.0];
        let mut x = vec![2.0, 9.0];
        triangular_solve_kernel(&l, &mut x, 2, 1, true, false, TransposeMode::NoTranspose)
            .unwrap();
        assert_close(&x, &[1.0, 2.0]);

        let mut y = vec![4.0, 8.0];
        triangular_solve_kernel(&l, &mut y, 2, 1, true, false, TransposeMode::Transpose).unwrap();
        // Lᵀ = [[2, 1], [0, 4]] -> y1 = 2, y0 = (4 - 2) / 2 = 1
        assert_close(&y, &[1.0, 2.0]);
    }

    #[test]
    fn test_triangular_unit_diagonal_ignores_diagonal() {
        let a = [99.0, 0.0, 3.0, -7.0];
        let mut x = vec![1.0, 5.0];
        triangular_solve_kernel(&a, &mut x, 2, 1, true, true, TransposeMode::NoTranspose)
            .unwrap();
        assert_close(&x, &[1.0, 2.0]);
    }

    #[test]
    fn test_triangular_zero_diagonal() {
        let a = [1.0, 1.0, 0.0, 0.0];
        let mut x = vec![1.0, 1.0];
        let err = triangular_solve_kernel(&a, &mut x, 2, 1, false, false, TransposeMode::NoTranspose)
            .unwrap_err();
        assert_eq!(err, Error::SingularMatrix { step: 1 });
    }

    #[test]
    fn test_conjugate_transpose_reads_conjugates() {
        // 1x1 system: conj(2i) x = 2 -> x = 2 / (-2i) = i
        let a = [Complex128::new(0.0, 2.0)];
        let mut x = vec![Complex128::new(2.0, 0.0)];
        triangular_solve_kernel(&a, &mut x, 1, 1, false, false, TransposeMode::ConjugateTranspose)
            .unwrap();
        assert!((x[0] - Complex128::new(0.0, 1.0)).magnitude() < 1e-12);
    }

    #[test]
    fn test_scatter_rows() {
        let src = [10, 11, 20, 21, 30, 31];
        let out = scatter_rows(&src, &[2, 0, 1], 2).unwrap();
        assert_eq!(out, vec![20, 21, 30, 31, 10, 11]);
        assert!(scatter_rows(&src, &[0, 1, 3], 2).is_err());
    }

    #[test]
    fn test_gather_bytes_middle_axis() {
        // [1, 3, 1] of u8, gather [2, 0]
        let out = gather_bytes(&[7, 8, 9], 1, 1, 3, 1, &[2, 0]).unwrap();
        assert_eq!(out, vec![9, 7]);
        let err = gather_bytes(&[7, 8, 9], 1, 1, 3, 1, &[3]).unwrap_err();
        assert_eq!(err, Error::IndexOutOfBounds { index: 3, size: 3 });
    }
}
