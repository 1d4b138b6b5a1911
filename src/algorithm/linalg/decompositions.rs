//! LU factorization results and the operations built on them
//!
//! - [`lu_factor`]: packed LU and pivots, the input of [`super::lu_solve`]
//! - [`lu`]: explicit P, L, U factors
//! - [`inv`]: matrix inverse by solving against the identity

use super::helpers::{validate_linalg_dtype, validate_matrix_2d, validate_square_matrix};
use super::lu_solve::lu_solve;
use super::permutation::lu_pivots_to_permutation;
use super::traits::{IndexingOps, LuFactorize, TransposeMode, TriangularSolve};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Packed LU factorization: P A = L U
///
/// L is lower triangular with unit diagonal, U is upper triangular.
/// P is stored as a pivot sequence.
pub struct LuFactorization<R: Runtime> {
    /// U in the upper triangle (diagonal included) and the strictly lower
    /// part of L below its implicit unit diagonal. Shape `[..., M, N]`.
    pub lu: Tensor<R>,

    /// Pivot indices: at step i, row i was swapped with row pivots[i].
    /// I64 tensor of shape `[..., min(M, N)]`.
    pub pivots: Tensor<R>,
}

impl<R: Runtime> Clone for LuFactorization<R> {
    fn clone(&self) -> Self {
        Self {
            lu: self.lu.clone(),
            pivots: self.pivots.clone(),
        }
    }
}

impl<R: Runtime> std::fmt::Debug for LuFactorization<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuFactorization")
            .field("lu", &self.lu)
            .field("pivots", &self.pivots)
            .finish()
    }
}

/// Explicit factors of A = P L U
///
/// For `A` of shape `[M, N]` and `K = min(M, N)`: `L` is `[M, K]` with unit
/// diagonal, `U` is `[K, N]`. With `permute_l`, `p` is `None` and `l` already
/// holds the row-permuted product `P L`.
pub struct PluDecomposition<R: Runtime> {
    /// Permutation matrix `[M, M]` with `P[perm[i], i] = 1`
    pub p: Option<Tensor<R>>,

    /// Unit lower factor `[M, K]`, or `P L` when permuted
    pub l: Tensor<R>,

    /// Upper factor `[K, N]`
    pub u: Tensor<R>,
}

impl<R: Runtime> std::fmt::Debug for PluDecomposition<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluDecomposition")
            .field("p", &self.p)
            .field("l", &self.l)
            .field("u", &self.u)
            .finish()
    }
}

/// Compute the packed LU factorization of a square matrix
///
/// `a` is `[..., M, M]`; each batch element is factored independently. The
/// result feeds [`super::lu_solve`].
pub fn lu_factor<R, C>(client: &C, a: &Tensor<R>) -> Result<LuFactorization<R>>
where
    R: Runtime,
    C: LuFactorize<R>,
{
    validate_square_matrix(a.shape())?;
    validate_linalg_dtype(a.dtype(), "lu_factor")?;
    client.lu_factor(a)
}

/// Compute A = P L U with explicit factors for a 2-D matrix `[M, N]`
///
/// `A` need not be square. With `permute_l = true` the permutation is folded
/// into L and [`PluDecomposition::p`] is `None`.
pub fn lu<R, C>(client: &C, a: &Tensor<R>, permute_l: bool) -> Result<PluDecomposition<R>>
where
    R: Runtime,
    C: LuFactorize<R>,
{
    let (m, n) = validate_matrix_2d(a.shape())?;
    validate_linalg_dtype(a.dtype(), "lu")?;

    let LuFactorization { lu: packed, pivots } = client.lu_factor(a)?;
    let permutation = lu_pivots_to_permutation(&pivots, m)?;
    let perm = permutation.to_i64_vec("lu")?;

    crate::dispatch_linalg_dtype!(a.dtype(), T => {
        unpack_plu::<R, T>(&packed.to_vec::<T>(), &perm, m, n, permute_l, a.device())
    }, "lu")
}

fn unpack_plu<R: Runtime, T: Element>(
    packed: &[T],
    perm: &[i64],
    m: usize,
    n: usize,
    permute_l: bool,
    device: &R::Device,
) -> Result<PluDecomposition<R>> {
    let k = m.min(n);

    let mut l = vec![T::zero(); m * k];
    for i in 0..m {
        let below = i.min(k);
        l[i * k..i * k + below].copy_from_slice(&packed[i * n..i * n + below]);
        if i < k {
            l[i * k + i] = T::one();
        }
    }

    let mut u = vec![T::zero(); k * n];
    for i in 0..k {
        u[i * n + i..(i + 1) * n].copy_from_slice(&packed[i * n + i..(i + 1) * n]);
    }
    let u = Tensor::try_from_slice(&u, &[k, n], device)?;

    if permute_l {
        // (P L)[perm[i], :] = L[i, :]
        let mut pl = vec![T::zero(); m * k];
        for (i, &row) in perm.iter().enumerate() {
            let row = row as usize;
            pl[row * k..(row + 1) * k].copy_from_slice(&l[i * k..(i + 1) * k]);
        }
        return Ok(PluDecomposition {
            p: None,
            l: Tensor::try_from_slice(&pl, &[m, k], device)?,
            u,
        });
    }

    let mut p = vec![T::zero(); m * m];
    for (i, &row) in perm.iter().enumerate() {
        p[row as usize * m + i] = T::one();
    }
    Ok(PluDecomposition {
        p: Some(Tensor::try_from_slice(&p, &[m, m], device)?),
        l: Tensor::try_from_slice(&l, &[m, k], device)?,
        u,
    })
}

/// Compute the inverse of a square 2-D matrix via LU
///
/// Integer matrices are promoted to F32 first. An exactly singular matrix
/// fails with `Error::SingularMatrix`.
pub fn inv<R, C>(client: &C, a: &Tensor<R>) -> Result<Tensor<R>>
where
    R: Runtime,
    C: LuFactorize<R> + TriangularSolve<R> + IndexingOps<R>,
{
    let (m, n) = validate_matrix_2d(a.shape())?;
    if m != n {
        return Err(Error::invalid_shape(a.shape(), "expected a square matrix"));
    }

    let a = match a.dtype() {
        DType::I32 | DType::I64 => {
            let values: Vec<f32> = a
                .to_i64_vec("inv")?
                .into_iter()
                .map(|v| v as f32)
                .collect();
            Tensor::try_from_slice(&values, a.shape(), a.device())?
        }
        _ => a.clone(),
    };

    let factors = lu_factor(client, &a)?;
    let identity = eye::<R>(n, a.dtype(), a.device())?;
    lu_solve(client, &factors, &identity, TransposeMode::NoTranspose)
}

fn eye<R: Runtime>(n: usize, dtype: DType, device: &R::Device) -> Result<Tensor<R>> {
    crate::dispatch_linalg_dtype!(dtype, T => {
        let mut data = vec![T::zero(); n * n];
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Tensor::try_from_slice(&data, &[n, n], device)
    }, "eye")
}
