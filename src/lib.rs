//! # lusolve
//!
//! **Dense LU solves over a pluggable tensor backend.**
//!
//! lusolve factors square matrices as `P A = L U` and solves `A x = b`,
//! `Aᵀ x = b` and `Aᴴ x = b` from the packed factorization. The algorithms
//! handle shapes, batching and pivot bookkeeping; the numerical kernels come
//! from a backend client implementing the capability traits in
//! [`algorithm::linalg`].
//!
//! ## Features
//!
//! - **LU solve**: vector and matrix right-hand sides, leading batch dims,
//!   all three transpose modes, real and complex dtypes
//! - **Pivot handling**: LAPACK-style pivot sequences to permutation arrays
//! - **Helpers**: `lu` (explicit P, L, U), `inv`, `solve_triangular`,
//!   `block_diag`
//! - **Reference CPU backend** with batch parallelism through rayon
//!
//! ## Quick Start
//!
//! ```
//! use lusolve::prelude::*;
//!
//! let device = CpuDevice::new();
//! let client = CpuRuntime::default_client(&device);
//!
//! let a = Tensor::<CpuRuntime>::try_from_slice(&[3.0f64, 1.0, 1.0, 2.0], &[2, 2], &device)?;
//! let b = Tensor::<CpuRuntime>::try_from_slice(&[9.0f64, 8.0], &[2], &device)?;
//!
//! let factors = lu_factor(&client, &a)?;
//! let x = lu_solve(&client, &factors, &b, TransposeMode::NoTranspose)?;
//! let x: Vec<f64> = x.to_vec();
//! assert!((x[0] - 2.0).abs() < 1e-12 && (x[1] - 3.0).abs() < 1e-12);
//! # Ok::<(), lusolve::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU backend
//! - `rayon` (default): Batch-parallel CPU kernels
//!
//! ## Logging
//!
//! Backend dispatch is reported through the [`log`] facade at `debug`,
//! pipeline stages at `trace`. The library installs no logger.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithm;
pub mod dtype;
pub mod error;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::linalg::{
        IndexingOps, LuFactorization, LuFactorize, TransposeMode, TriangularOptions,
        TriangularSolve, block_diag, inv, lu, lu_factor, lu_solve, solve_triangular,
    };
    pub use crate::dtype::DType;
    pub use crate::error::{Error, Result};
    pub use crate::runtime::{Device, Runtime, RuntimeClient};
    pub use crate::tensor::{Layout, Tensor};

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
}

/// Default runtime based on enabled features
#[cfg(feature = "cpu")]
pub type DefaultRuntime = runtime::cpu::CpuRuntime;
