//! Helper functions for linear algebra operations
//!
//! Validation utilities shared by the algorithms and the backends.

use crate::dtype::DType;
use crate::error::{Error, Result};

/// Validate matrix is 2D, returning `(rows, cols)`
pub fn validate_matrix_2d(shape: &[usize]) -> Result<(usize, usize)> {
    match shape {
        [m, n] => Ok((*m, *n)),
        _ => Err(Error::invalid_shape(shape, "expected a 2-D matrix")),
    }
}

/// Validate a (possibly batched) square matrix `[..., M, M]`, returning `M`
pub fn validate_square_matrix(shape: &[usize]) -> Result<usize> {
    let ndim = shape.len();
    if ndim < 2 {
        return Err(Error::invalid_shape(
            shape,
            "matrix must have at least 2 dimensions",
        ));
    }
    let (m, n) = (shape[ndim - 2], shape[ndim - 1]);
    if m != n {
        return Err(Error::invalid_shape(
            shape,
            "last two dimensions must be equal",
        ));
    }
    Ok(n)
}

/// Leading (batch) dimensions of a `[..., M, M]` shape
#[inline]
pub fn batch_dims(shape: &[usize]) -> &[usize] {
    &shape[..shape.len().saturating_sub(2)]
}

/// Number of matrices in a batch (1 for an unbatched matrix)
#[inline]
pub fn batch_count(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Validate a dtype is one the linear algebra kernels accept
pub fn validate_linalg_dtype(dtype: DType, op: &'static str) -> Result<()> {
    if dtype.is_linalg() {
        Ok(())
    } else {
        Err(Error::unsupported_dtype(dtype, op))
    }
}

/// Validate two operands share a dtype
pub fn validate_same_dtype(lhs: DType, rhs: DType) -> Result<()> {
    if lhs == rhs {
        Ok(())
    } else {
        Err(Error::DTypeMismatch { lhs, rhs })
    }
}
