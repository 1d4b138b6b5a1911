//! General triangular solves

use super::helpers::{validate_linalg_dtype, validate_same_dtype};
use super::lu_solve::{RhsKind, validate_lu_shapes};
use super::traits::{TriangularOptions, TriangularSolve};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Solve `op(A) x = b` for a triangular 2-D matrix `a`
///
/// Only the triangle selected by `options.lower` is read; with
/// `options.unit_diagonal` the diagonal is assumed to be ones. `b` is `[M]`
/// or `[M, ...]` and the result has `b`'s shape.
pub fn solve_triangular<R, C>(
    client: &C,
    a: &Tensor<R>,
    b: &Tensor<R>,
    options: TriangularOptions,
) -> Result<Tensor<R>>
where
    R: Runtime,
    C: TriangularSolve<R>,
{
    if a.ndim() != 2 {
        return Err(Error::invalid_shape(a.shape(), "expected a 2-D matrix"));
    }
    let kind = validate_lu_shapes(a.shape(), b.shape())?;
    validate_linalg_dtype(a.dtype(), "solve_triangular")?;
    validate_same_dtype(a.dtype(), b.dtype())?;
    if !a.same_device(b) {
        return Err(Error::DeviceMismatch);
    }

    let rhs = match kind {
        RhsKind::Vector => b.unsqueeze(-1)?,
        RhsKind::Matrix => b.clone(),
    };
    let m = a.shape()[0];
    let columns: usize = rhs.shape()[1..].iter().product();

    let x = client.solve_triangular(a, &rhs.reshape(&[m, columns])?, options)?;
    let x = x.reshape(rhs.shape())?;

    match kind {
        RhsKind::Vector => x.squeeze(-1),
        RhsKind::Matrix => Ok(x),
    }
}
