//! CPU implementation of the linear algebra capabilities
//!
//! Implements [`LuFactorize`], [`TriangularSolve`] and [`IndexingOps`] for
//! [`CpuClient`]. All kernels follow the contracts documented on the traits.

use super::kernels;
use super::{CpuClient, CpuRuntime};
use crate::algorithm::linalg::{
    IndexingOps, LuFactorization, LuFactorize, TransposeMode, TriangularOptions, TriangularSolve,
    batch_count, validate_linalg_dtype, validate_matrix_2d, validate_same_dtype,
    validate_square_matrix,
};
use crate::dtype::{DType, LinalgElement};
use crate::error::{Error, Result};
use crate::runtime::RuntimeClient;
use crate::tensor::{Layout, Storage, Tensor};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

impl LuFactorize<CpuRuntime> for CpuClient {
    fn lu_factor(&self, a: &Tensor<CpuRuntime>) -> Result<LuFactorization<CpuRuntime>> {
        validate_linalg_dtype(a.dtype(), "lu_factor")?;
        let ndim = a.ndim();
        if ndim < 2 {
            return Err(Error::invalid_shape(
                a.shape(),
                "matrix must have at least 2 dimensions",
            ));
        }
        let (m, n) = (a.shape()[ndim - 2], a.shape()[ndim - 1]);

        log::debug!("cpu lu_factor: shape {:?}, dtype {}", a.shape(), a.dtype());
        crate::dispatch_linalg_dtype!(a.dtype(), T => {
            lu_factor_typed::<T>(self, a, m, n)
        }, "lu_factor")
    }
}

fn lu_factor_typed<T: LinalgElement>(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    m: usize,
    n: usize,
) -> Result<LuFactorization<CpuRuntime>> {
    let batch_shape = &a.shape()[..a.ndim() - 2];
    let batch = batch_count(batch_shape);
    let k = m.min(n);

    let mut lu: Vec<T> = a.to_vec();
    let mut pivots = vec![0i64; batch * k];

    if k > 0 {
        let zero_pivots = factor_batches(client, &mut lu, &mut pivots, m, n, k);
        if let Some((b, step)) = zero_pivots
            .iter()
            .enumerate()
            .find_map(|(b, s)| s.map(|step| (b, step)))
        {
            log::warn!(
                "lu_factor: matrix {b} of {batch} is exactly singular (zero pivot at step {step})"
            );
        }
    }

    let mut pivot_shape = batch_shape.to_vec();
    pivot_shape.push(k);

    Ok(LuFactorization {
        lu: Tensor::try_from_slice(&lu, a.shape(), client.device())?,
        pivots: Tensor::try_from_slice(&pivots, &pivot_shape, client.device())?,
    })
}

/// Factor every `[m, n]` matrix of a contiguous batch, returning the first
/// zero-pivot step of each
#[cfg(feature = "rayon")]
fn factor_batches<T: LinalgElement>(
    client: &CpuClient,
    lu: &mut [T],
    pivots: &mut [i64],
    m: usize,
    n: usize,
    k: usize,
) -> Vec<Option<usize>> {
    lu.par_chunks_mut(m * n)
        .zip(pivots.par_chunks_mut(k))
        .with_min_len(client.rayon_min_len())
        .map(|(a, piv)| kernels::lu_factor_kernel(a, piv, m, n))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn factor_batches<T: LinalgElement>(
    _client: &CpuClient,
    lu: &mut [T],
    pivots: &mut [i64],
    m: usize,
    n: usize,
    k: usize,
) -> Vec<Option<usize>> {
    lu.chunks_mut(m * n)
        .zip(pivots.chunks_mut(k))
        .map(|(a, piv)| kernels::lu_factor_kernel(a, piv, m, n))
        .collect()
}

impl TriangularSolve<CpuRuntime> for CpuClient {
    fn lu_triangular_solve(
        &self,
        lu: &Tensor<CpuRuntime>,
        rhs: &Tensor<CpuRuntime>,
        trans: TransposeMode,
        output_permutation: Option<&Tensor<CpuRuntime>>,
    ) -> Result<Tensor<CpuRuntime>> {
        let (m, p) = validate_solve_operands(lu, rhs, "lu_triangular_solve")?;
        let perm = match output_permutation {
            Some(perm) => {
                let perm = perm.to_i64_vec("lu_triangular_solve")?;
                if perm.len() != m {
                    return Err(Error::shape_mismatch(&[m], &[perm.len()]));
                }
                Some(perm)
            }
            None => None,
        };

        log::debug!(
            "cpu lu_triangular_solve: lu [{m}, {m}], rhs [{m}, {p}], trans={trans}, dtype {}",
            lu.dtype()
        );
        crate::dispatch_linalg_dtype!(lu.dtype(), T => {
            let a: Vec<T> = lu.to_vec();
            let mut x: Vec<T> = rhs.to_vec();
            kernels::lu_solve_kernel(&a, &mut x, m, p, trans)?;
            let x = match perm {
                Some(perm) => kernels::scatter_rows(&x, &perm, p)?,
                None => x,
            };
            Tensor::try_from_slice(&x, &[m, p], self.device())
        }, "lu_triangular_solve")
    }

    fn solve_triangular(
        &self,
        a: &Tensor<CpuRuntime>,
        b: &Tensor<CpuRuntime>,
        options: TriangularOptions,
    ) -> Result<Tensor<CpuRuntime>> {
        let (m, p) = validate_solve_operands(a, b, "solve_triangular")?;

        log::debug!(
            "cpu solve_triangular: a [{m}, {m}], b [{m}, {p}], {options:?}, dtype {}",
            a.dtype()
        );
        crate::dispatch_linalg_dtype!(a.dtype(), T => {
            let a_data: Vec<T> = a.to_vec();
            let mut x: Vec<T> = b.to_vec();
            kernels::triangular_solve_kernel(
                &a_data,
                &mut x,
                m,
                p,
                options.lower,
                options.unit_diagonal,
                options.trans,
            )?;
            Tensor::try_from_slice(&x, &[m, p], self.device())
        }, "solve_triangular")
    }
}

/// Check `a` `[m, m]` against `rhs` `[m, p]`, returning `(m, p)`
fn validate_solve_operands(
    a: &Tensor<CpuRuntime>,
    rhs: &Tensor<CpuRuntime>,
    op: &'static str,
) -> Result<(usize, usize)> {
    validate_linalg_dtype(a.dtype(), op)?;
    validate_same_dtype(a.dtype(), rhs.dtype())?;
    validate_matrix_2d(a.shape())?;
    let m = validate_square_matrix(a.shape())?;
    let (rows, p) = validate_matrix_2d(rhs.shape())?;
    if rows != m {
        return Err(Error::shape_mismatch(&[m, p], rhs.shape()));
    }
    Ok((m, p))
}

impl IndexingOps<CpuRuntime> for CpuClient {
    fn index_select(
        &self,
        a: &Tensor<CpuRuntime>,
        dim: isize,
        indices: &Tensor<CpuRuntime>,
    ) -> Result<Tensor<CpuRuntime>> {
        let axis = a.layout().normalize_dim(dim).ok_or(Error::InvalidDimension {
            dim,
            ndim: a.ndim(),
        })?;
        if indices.ndim() != 1 {
            return Err(Error::invalid_shape(
                indices.shape(),
                "index_select indices must be 1-D",
            ));
        }
        if !matches!(indices.dtype(), DType::I32 | DType::I64) {
            return Err(Error::unsupported_dtype(indices.dtype(), "index_select"));
        }
        let idx = indices.to_i64_vec("index_select")?;

        let shape = a.shape();
        let outer: usize = shape[..axis].iter().product();
        let inner: usize = shape[axis + 1..].iter().product();
        let bytes = kernels::gather_bytes(
            a.raw_bytes(),
            a.dtype().size_in_bytes(),
            outer,
            shape[axis],
            inner,
            &idx,
        )?;

        let mut out_shape = shape.to_vec();
        out_shape[axis] = idx.len();
        Ok(Tensor::from_parts(
            Storage::from_bytes(bytes, a.dtype(), self.device()),
            Layout::contiguous(&out_shape),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cpu::CpuDevice;

    fn client() -> CpuClient {
        CpuClient::new(CpuDevice::new())
    }

    #[test]
    fn test_lu_factor_batched_pivots() {
        let c = client();
        let a = Tensor::<CpuRuntime>::from_slice(
            &[1.0f64, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0],
            &[2, 2, 2],
            c.device(),
        );
        let f = c.lu_factor(&a).unwrap();
        assert_eq!(f.pivots.shape(), &[2, 2]);
        assert_eq!(f.pivots.to_vec::<i64>(), vec![0, 1, 1, 1]);
        assert_eq!(f.lu.shape(), &[2, 2, 2]);
    }

    #[test]
    fn test_lu_factor_rectangular() {
        let c = client();
        let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2], c.device());
        let f = c.lu_factor(&a).unwrap();
        assert_eq!(f.lu.shape(), &[3, 2]);
        assert_eq!(f.pivots.shape(), &[2]);
        assert_eq!(f.pivots.to_vec::<i64>()[0], 2);
    }

    #[test]
    fn test_lu_factor_rejects_integers() {
        let c = client();
        let a = Tensor::<CpuRuntime>::from_slice(&[1i32, 0, 0, 1], &[2, 2], c.device());
        assert!(matches!(
            c.lu_factor(&a),
            Err(Error::UnsupportedDType { op: "lu_factor", .. })
        ));
    }

    #[test]
    fn test_output_permutation_scatters_rows() {
        let c = client();
        // Identity LU: the solve is a no-op, leaving only the scatter
        let lu = Tensor::<CpuRuntime>::from_slice(
            &[1.0f64, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            &[3, 3],
            c.device(),
        );
        let rhs = Tensor::<CpuRuntime>::from_slice(&[1.0f64, 2.0, 3.0], &[3, 1], c.device());
        let perm = Tensor::<CpuRuntime>::from_slice(&[2i64, 0, 1], &[3], c.device());
        let x = c
            .lu_triangular_solve(&lu, &rhs, TransposeMode::Transpose, Some(&perm))
            .unwrap();
        assert_eq!(x.to_vec::<f64>(), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_lu_triangular_solve_shape_checks() {
        let c = client();
        let lu = Tensor::<CpuRuntime>::from_slice(&[1.0f64, 0.0, 0.0, 1.0], &[2, 2], c.device());
        let rhs = Tensor::<CpuRuntime>::from_slice(&[1.0f64, 2.0, 3.0], &[3, 1], c.device());
        assert!(
            c.lu_triangular_solve(&lu, &rhs, TransposeMode::NoTranspose, None)
                .unwrap_err()
                .is_shape_error()
        );
        let rhs32 = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0], &[2, 1], c.device());
        assert!(matches!(
            c.lu_triangular_solve(&lu, &rhs32, TransposeMode::NoTranspose, None),
            Err(Error::DTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_index_select_rows_and_columns() {
        let c = client();
        let a = Tensor::<CpuRuntime>::from_slice(&[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2], c.device());
        let rows = Tensor::<CpuRuntime>::from_slice(&[2i64, 0], &[2], c.device());
        let out = c.index_select(&a, 0, &rows).unwrap();
        assert_eq!(out.shape(), &[2, 2]);
        assert_eq!(out.to_vec::<f64>(), vec![5.0, 6.0, 1.0, 2.0]);

        let cols = Tensor::<CpuRuntime>::from_slice(&[1i32, 1, 0], &[3], c.device());
        let out = c.index_select(&a, -1, &cols).unwrap();
        assert_eq!(out.shape(), &[3, 3]);
        assert_eq!(out.to_vec::<f64>(), vec![2.0, 2.0, 1.0, 4.0, 4.0, 3.0, 6.0, 6.0, 5.0]);
    }

    #[test]
    fn test_index_select_errors() {
        let c = client();
        let a = Tensor::<CpuRuntime>::from_slice(&[1.0f64, 2.0], &[2], c.device());
        let idx = Tensor::<CpuRuntime>::from_slice(&[2i64], &[1], c.device());
        assert!(matches!(
            c.index_select(&a, 0, &idx),
            Err(Error::IndexOutOfBounds { index: 2, size: 2 })
        ));
        assert!(matches!(
            c.index_select(&a, 1, &idx),
            Err(Error::InvalidDimension { dim: 1, ndim: 1 })
        ));
        let float_idx = Tensor::<CpuRuntime>::from_slice(&[0.0f64], &[1], c.device());
        assert!(c.index_select(&a, 0, &float_idx).is_err());
    }
}
