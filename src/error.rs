//! Error types for lusolve

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using lusolve's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lusolve operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape mismatch between two operands
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// A single operand has a shape the operation cannot accept
    #[error("Invalid shape {shape:?}: {reason}")]
    InvalidShape {
        /// The offending shape
        shape: Vec<usize>,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Invalid dimension index
    #[error("Invalid dimension {dim} for tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension
        dim: isize,
        /// Number of dimensions
        ndim: usize,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// DType mismatch between operands
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Left-hand side dtype
        lhs: DType,
        /// Right-hand side dtype
        rhs: DType,
    },

    /// Device mismatch between operands
    #[error("Device mismatch: tensors must be on the same device")]
    DeviceMismatch,

    /// Index out of bounds
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: i64,
        /// Size of the dimension
        size: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Matrix is exactly singular (zero pivot during factorization or solve)
    #[error("Singular matrix: zero pivot at step {step}")]
    SingularMatrix {
        /// Elimination step at which the zero pivot appeared
        step: usize,
    },

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid shape error
    pub fn invalid_shape(shape: &[usize], reason: &'static str) -> Self {
        Self::InvalidShape {
            shape: shape.to_vec(),
            reason,
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Whether this error reports an inadmissible operand shape
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. } | Self::InvalidShape { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::shape_mismatch(&[4], &[5]);
        assert_eq!(err.to_string(), "Shape mismatch: expected [4], got [5]");

        let err = Error::invalid_argument("trans", "must be 0, 1 or 2, got 3");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'trans': must be 0, 1 or 2, got 3"
        );
    }

    #[test]
    fn test_is_shape_error() {
        assert!(Error::invalid_shape(&[3, 2], "not square").is_shape_error());
        assert!(Error::shape_mismatch(&[4], &[5]).is_shape_error());
        assert!(!Error::SingularMatrix { step: 0 }.is_shape_error());
    }
}
