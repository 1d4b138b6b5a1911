//! Capability contracts consumed by the LU algorithms
//!
//! Each trait is one numerical primitive a backend client supplies. The
//! generic algorithms in this module never call a kernel directly; they
//! require the capabilities they need as bounds on the client type, so the
//! same solve logic targets any backend implementing them.

use super::decompositions::LuFactorization;
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::tensor::Tensor;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Transpose Mode
// ============================================================================

/// Which system a triangular or LU solve targets
///
/// | Mode                 | Code | Tag | System     |
/// |----------------------|------|-----|------------|
/// | `NoTranspose`        | 0    | N   | A x = b    |
/// | `Transpose`          | 1    | T   | Aᵀ x = b   |
/// | `ConjugateTranspose` | 2    | C   | Aᴴ x = b   |
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransposeMode {
    /// Solve A x = b
    #[default]
    NoTranspose,
    /// Solve Aᵀ x = b
    Transpose,
    /// Solve Aᴴ x = b (same as `Transpose` for real dtypes)
    ConjugateTranspose,
}

impl TransposeMode {
    /// Integer code (0, 1, 2)
    pub const fn code(self) -> i64 {
        match self {
            Self::NoTranspose => 0,
            Self::Transpose => 1,
            Self::ConjugateTranspose => 2,
        }
    }

    /// Symbolic tag ('N', 'T', 'C')
    pub const fn tag(self) -> char {
        match self {
            Self::NoTranspose => 'N',
            Self::Transpose => 'T',
            Self::ConjugateTranspose => 'C',
        }
    }

    /// Whether the system uses the transposed factors
    pub const fn is_transposed(self) -> bool {
        !matches!(self, Self::NoTranspose)
    }
}

impl TryFrom<i64> for TransposeMode {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::NoTranspose),
            1 => Ok(Self::Transpose),
            2 => Ok(Self::ConjugateTranspose),
            _ => Err(Error::invalid_argument(
                "trans",
                format!("value must be 0, 1 or 2, got {code}"),
            )),
        }
    }
}

impl TryFrom<char> for TransposeMode {
    type Error = Error;

    fn try_from(tag: char) -> Result<Self> {
        match tag {
            'N' | 'n' => Ok(Self::NoTranspose),
            'T' | 't' => Ok(Self::Transpose),
            'C' | 'c' => Ok(Self::ConjugateTranspose),
            _ => Err(Error::invalid_argument(
                "trans",
                format!("tag must be 'N', 'T' or 'C', got {tag:?}"),
            )),
        }
    }
}

impl FromStr for TransposeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(tag), None) => Self::try_from(tag),
            _ => Err(Error::invalid_argument(
                "trans",
                format!("tag must be 'N', 'T' or 'C', got {s:?}"),
            )),
        }
    }
}

impl fmt::Display for TransposeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ============================================================================
// Triangular Solve Options
// ============================================================================

/// Options for a general triangular solve
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TriangularOptions {
    /// Read the lower triangle of `a` (default: upper)
    pub lower: bool,
    /// Assume a unit diagonal; diagonal entries are not read
    pub unit_diagonal: bool,
    /// Which system to solve
    pub trans: TransposeMode,
}

// ============================================================================
// Capabilities
// ============================================================================

/// Partial-pivoting LU factorization primitive: P A = L U
///
/// # Algorithm Contract (Doolittle with Partial Pivoting)
///
/// ```text
/// For k = 0 to min(M, N) - 1:
///   pivot_row = argmax(|A[k:M, k]|) + k
///   swap(A[k, :], A[pivot_row, :]);  pivots[k] = pivot_row
///   if A[k, k] == 0: continue          (U is singular; column left as is)
///   A[i, k] /= A[k, k]                for i > k
///   A[i, j] -= A[i, k] * A[k, j]      for i, j > k
/// ```
///
/// An exactly singular input still factors; the zero lands on the diagonal
/// of U and any later solve with it fails with `Error::SingularMatrix`.
pub trait LuFactorize<R: Runtime> {
    /// Factor a matrix `[..., M, N]`, batch dims leading
    ///
    /// Returns the packed LU (`[..., M, N]`, same dtype) and LAPACK-style
    /// pivots (`[..., min(M, N)]`, I64): at step `i`, row `i` was swapped
    /// with row `pivots[i]`.
    fn lu_factor(&self, a: &Tensor<R>) -> Result<LuFactorization<R>>;
}

/// Triangular solve primitives
pub trait TriangularSolve<R: Runtime> {
    /// Solve with a packed LU matrix
    ///
    /// `lu` is `[M, M]` holding U in its upper triangle and the strictly lower
    /// part of a unit-lower L; `rhs` is `[M, P]` of the same dtype.
    ///
    /// - `NoTranspose`: solves `L U x = rhs` (forward then back substitution).
    ///   `rhs` is expected already row-permuted.
    /// - `Transpose` / `ConjugateTranspose`: solves `Uᵀ Lᵀ z = rhs` (resp.
    ///   `Uᴴ Lᴴ z = rhs`).
    ///
    /// When `output_permutation` (I64 `[M]`) is given, the result rows are
    /// scattered through it: `x[perm[i]] = z[i]`. That is how the row
    /// pivoting of `P A = L U` is undone for the transposed systems, whose
    /// permutation acts on the solution rather than on the right-hand side.
    fn lu_triangular_solve(
        &self,
        lu: &Tensor<R>,
        rhs: &Tensor<R>,
        trans: TransposeMode,
        output_permutation: Option<&Tensor<R>>,
    ) -> Result<Tensor<R>>;

    /// Solve `op(A) x = b` for a triangular `a` `[M, M]` and `b` `[M, P]`
    fn solve_triangular(
        &self,
        a: &Tensor<R>,
        b: &Tensor<R>,
        options: TriangularOptions,
    ) -> Result<Tensor<R>>;
}

/// Integer-index gather
pub trait IndexingOps<R: Runtime> {
    /// Gather slices of `a` along `dim` at `indices` (I32/I64, 1-D)
    ///
    /// `out[.., i, ..] = a[.., indices[i], ..]`
    fn index_select(&self, a: &Tensor<R>, dim: isize, indices: &Tensor<R>) -> Result<Tensor<R>>;
}
