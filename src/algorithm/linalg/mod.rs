//! Dense linear algebra over LU factorizations
//!
//! The algorithms here are written once against the capability traits in
//! [`traits`] and run on any client implementing them. They own shape
//! checking, pivot handling and argument marshalling; the numerical kernels
//! belong to the backend.
//!
//! # Module Structure
//!
//! - `traits`: `LuFactorize`, `TriangularSolve`, `IndexingOps`, `TransposeMode`
//! - `permutation`: pivot sequence to permutation array conversion
//! - `lu_solve`: shape validation, triangular-solve dispatch, the `lu_solve` facade
//! - `decompositions`: `LuFactorization`, `lu_factor`, `lu`, `inv`
//! - `triangular`: the `solve_triangular` facade
//! - `block_diag`: block-diagonal assembly
//! - `helpers`: validation utilities

pub mod block_diag;
pub mod decompositions;
pub mod helpers;
pub mod lu_solve;
pub mod permutation;
pub mod traits;
pub mod triangular;

pub use block_diag::block_diag;
pub use decompositions::{LuFactorization, PluDecomposition, inv, lu, lu_factor};
pub use helpers::*;
pub use lu_solve::{RhsKind, lu_solve, lu_solve_core, validate_lu_shapes};
pub use permutation::{lu_pivots_to_permutation, pivots_to_permutation};
pub use traits::*;
pub use triangular::solve_triangular;
