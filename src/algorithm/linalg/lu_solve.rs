//! Solving linear systems from a packed LU factorization
//!
//! Pipeline:
//!
//! ```text
//! validate_lu_shapes        vector or matrix right-hand side?
//!   -> lu_pivots_to_permutation   pivots [..., M] -> permutation [..., M]
//!   -> lu_solve_core (per batch)  permute, flatten, TriangularSolve, reshape
//!   -> squeeze                    vector case only
//! ```
//!
//! # Transpose modes and the permutation
//!
//! With `P A = L U`, the three systems unwind differently:
//!
//! - `A x = b`: `L U x = P b`, so the right-hand side is gathered through the
//!   permutation *before* the triangular solves.
//! - `Aᵀ x = b` (and `Aᴴ x = b`): `Aᵀ = Uᵀ Lᵀ P`, so the triangular solves run
//!   on the unpermuted `b` and the permutation is applied to the *result*.
//!   The dispatcher hands the permutation to the triangular-solve capability
//!   as its output permutation instead of gathering the input.
//!
//! Getting this backwards still produces a finite answer, just a wrong one,
//! so both paths are covered by tests against the defining equations.

use super::decompositions::LuFactorization;
use super::helpers::{
    batch_count, batch_dims, validate_linalg_dtype, validate_same_dtype, validate_square_matrix,
};
use super::permutation::lu_pivots_to_permutation;
use super::traits::{IndexingOps, TransposeMode, TriangularSolve};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// How a right-hand side relates to the LU matrix
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RhsKind {
    /// One fewer dimension than the LU matrix: one column per batch element
    Vector,
    /// Row dimension followed by any number of column dimensions
    Matrix,
}

/// Check that a packed LU matrix and a right-hand side are solve-compatible
///
/// - `lu` must be `[..., M, M]`.
/// - `rhs` with exactly one dimension fewer than `lu` is the vector case and
///   must be `[..., M]`.
/// - Otherwise `rhs` is the matrix case, `[..., M, ...]`: the batch dims of
///   `lu`, then the row dimension, then column dimensions. The second-to-last
///   dimension must also be `M`, so extra column dims come in as `[M, ..., M, K]`.
///
/// Nothing is computed; every failure is an `InvalidShape` or
/// `ShapeMismatch` error.
pub fn validate_lu_shapes(lu_shape: &[usize], rhs_shape: &[usize]) -> Result<RhsKind> {
    let m = validate_square_matrix(lu_shape)?;
    if rhs_shape.is_empty() {
        return Err(Error::invalid_shape(
            rhs_shape,
            "right-hand side must have at least 1 dimension",
        ));
    }

    let batch = batch_dims(lu_shape);
    let expected = |tail: &[usize]| -> Vec<usize> {
        let mut shape = batch.to_vec();
        shape.extend_from_slice(tail);
        shape
    };

    if lu_shape.len() == rhs_shape.len() + 1 {
        if rhs_shape[..batch.len()] != *batch || rhs_shape[batch.len()] != m {
            return Err(Error::shape_mismatch(&expected(&[m]), rhs_shape));
        }
        return Ok(RhsKind::Vector);
    }

    if rhs_shape.len() < lu_shape.len() {
        return Err(Error::invalid_shape(
            rhs_shape,
            "right-hand side has too few dimensions for this LU matrix",
        ));
    }
    if rhs_shape[..batch.len()] != *batch || rhs_shape[batch.len()] != m {
        return Err(Error::shape_mismatch(
            &expected(&[m]),
            &rhs_shape[..=batch.len()],
        ));
    }
    let second_last = rhs_shape[rhs_shape.len() - 2];
    if second_last != m {
        return Err(Error::invalid_shape(
            rhs_shape,
            "second-to-last dimension of right-hand side must match the LU matrix size",
        ));
    }
    Ok(RhsKind::Matrix)
}

/// Solve one unbatched system from its packed LU and permutation
///
/// `lu` is `[M, M]`, `permutation` is `[M]` (as built by
/// [`lu_pivots_to_permutation`]) and `rhs` is `[M, ...]`. Trailing dims of
/// `rhs` are flattened into one column dimension for the backend and
/// restored on the way out, so the result has exactly `rhs`'s shape.
pub fn lu_solve_core<R, C>(
    client: &C,
    lu: &Tensor<R>,
    permutation: &Tensor<R>,
    rhs: &Tensor<R>,
    trans: TransposeMode,
) -> Result<Tensor<R>>
where
    R: Runtime,
    C: TriangularSolve<R> + IndexingOps<R>,
{
    if lu.ndim() != 2 {
        return Err(Error::invalid_shape(lu.shape(), "expected a 2-D LU matrix"));
    }
    let m = validate_square_matrix(lu.shape())?;
    match rhs.shape().first() {
        Some(&rows) if rows == m => {}
        _ => return Err(Error::shape_mismatch(&[m], rhs.shape())),
    }
    if permutation.shape() != [m] {
        return Err(Error::shape_mismatch(&[m], permutation.shape()));
    }

    let columns: usize = rhs.shape()[1..].iter().product();
    let x = rhs.reshape(&[m, columns])?;

    let solved = match trans {
        TransposeMode::NoTranspose => {
            let x = client.index_select(&x, 0, permutation)?;
            client.lu_triangular_solve(lu, &x, trans, None)?
        }
        TransposeMode::Transpose | TransposeMode::ConjugateTranspose => {
            client.lu_triangular_solve(lu, &x, trans, Some(permutation))?
        }
    };

    solved.reshape(rhs.shape())
}

/// Solve `A x = b`, `Aᵀ x = b` or `Aᴴ x = b` given the LU factorization of `A`
///
/// `factors` is the output of [`super::lu_factor`] (or any backend
/// producing the same packed layout and LAPACK-style pivots). `b` is `[..., M]`
/// (vector case) or `[..., M, ...]` (matrix case); the solution has exactly
/// `b`'s shape. Batched factors solve each batch element with its own pivots.
///
/// # Example
///
/// ```
/// use lusolve::prelude::*;
/// use lusolve::algorithm::linalg::{lu_factor, lu_solve, TransposeMode};
///
/// let device = CpuDevice::new();
/// let client = CpuRuntime::default_client(&device);
/// let a = Tensor::<CpuRuntime>::try_from_slice(&[4.0f64, 3.0, 6.0, 3.0], &[2, 2], &device)?;
/// let b = Tensor::<CpuRuntime>::try_from_slice(&[10.0f64, 12.0], &[2], &device)?;
///
/// let factors = lu_factor(&client, &a)?;
/// let x = lu_solve(&client, &factors, &b, TransposeMode::NoTranspose)?;
/// let x: Vec<f64> = x.to_vec();
/// assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] - 2.0).abs() < 1e-12);
/// # Ok::<(), lusolve::error::Error>(())
/// ```
///
/// # Errors
///
/// Shape and dtype errors are raised before any numeric work. Numerical
/// failures (an exactly singular U) come from the backend unchanged.
pub fn lu_solve<R, C>(
    client: &C,
    factors: &LuFactorization<R>,
    b: &Tensor<R>,
    trans: TransposeMode,
) -> Result<Tensor<R>>
where
    R: Runtime,
    C: TriangularSolve<R> + IndexingOps<R>,
{
    let LuFactorization { lu, pivots } = factors;

    let kind = validate_lu_shapes(lu.shape(), b.shape())?;
    validate_linalg_dtype(lu.dtype(), "lu_solve")?;
    validate_same_dtype(lu.dtype(), b.dtype())?;
    if !lu.same_device(b) || !lu.same_device(pivots) {
        return Err(Error::DeviceMismatch);
    }

    let m = lu.shape()[lu.ndim() - 1];
    let batch = batch_dims(lu.shape());
    let mut pivot_shape = batch.to_vec();
    pivot_shape.push(m);
    if pivots.shape() != pivot_shape.as_slice() {
        return Err(Error::shape_mismatch(&pivot_shape, pivots.shape()));
    }

    // Working view only; `b` itself is never touched
    let rhs = match kind {
        RhsKind::Vector => b.unsqueeze(-1)?,
        RhsKind::Matrix => b.clone(),
    };

    let permutation = lu_pivots_to_permutation(pivots, m)?;
    log::trace!(
        "lu_solve: lu {:?}, rhs {:?} ({:?}), trans={}",
        lu.shape(),
        b.shape(),
        kind,
        trans
    );

    let x = if batch.is_empty() {
        lu_solve_core(client, lu, &permutation, &rhs, trans)?
    } else {
        solve_batched(client, lu, &permutation, &rhs, batch.len(), trans)?
    };

    match kind {
        RhsKind::Vector => x.squeeze(-1),
        RhsKind::Matrix => Ok(x),
    }
}

/// Run [`lu_solve_core`] for every batch element and stack the results
fn solve_batched<R, C>(
    client: &C,
    lu: &Tensor<R>,
    permutation: &Tensor<R>,
    rhs: &Tensor<R>,
    batch_ndim: usize,
    trans: TransposeMode,
) -> Result<Tensor<R>>
where
    R: Runtime,
    C: TriangularSolve<R> + IndexingOps<R>,
{
    let count = batch_count(&lu.shape()[..batch_ndim]);
    if count == 0 {
        return Ok(Tensor::zeros(rhs.shape(), rhs.dtype(), rhs.device()));
    }

    let m = lu.shape()[batch_ndim];
    let rhs_inner = &rhs.shape()[batch_ndim..];
    let mut rhs_flat_shape = Vec::with_capacity(rhs_inner.len() + 1);
    rhs_flat_shape.push(count);
    rhs_flat_shape.extend_from_slice(rhs_inner);

    let lu_flat = lu.reshape(&[count, m, m])?;
    let perm_flat = permutation.reshape(&[count, m])?;
    let rhs_flat = rhs.reshape(&rhs_flat_shape)?;

    let solved = (0..count)
        .map(|i| {
            let lu_i = lu_flat.narrow_leading(i, 1)?.reshape(&[m, m])?;
            let perm_i = perm_flat.narrow_leading(i, 1)?.reshape(&[m])?;
            let rhs_i = rhs_flat.narrow_leading(i, 1)?.reshape(rhs_inner)?;
            lu_solve_core(client, &lu_i, &perm_i, &rhs_i, trans)
        })
        .collect::<Result<Vec<_>>>()?;

    Tensor::stack(&solved)?.reshape(rhs.shape())
}
