//! Pivot sequence to permutation array conversion
//!
//! Partial-pivoting factorizations record their row interchanges as a pivot
//! sequence: at step `i`, row `i` of the working matrix was swapped with row
//! `pivots[i]`. Because each swap acts on the already-permuted rows, the
//! sequence is a compact, order-dependent encoding of a permutation. Solving
//! needs the explicit form instead, a gather index with
//! `permuted[i] = original[permutation[i]]`.
//!
//! ```text
//! pivots = [2, 2, 3, 3]
//! start      [0, 1, 2, 3]
//! swap(0, 2) [2, 1, 0, 3]
//! swap(1, 2) [2, 0, 1, 3]
//! swap(2, 3) [2, 0, 3, 1]
//! swap(3, 3) [2, 0, 3, 1]   <- permutation
//! ```

use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Build permutation arrays from batched pivot sequences on the host
///
/// `pivots` holds `batch` sequences of `k` steps each, back to back. Returns
/// `batch` permutations of length `size`, back to back.
///
/// The swaps are replayed strictly in step order within each sequence; the
/// sequences themselves are independent of one another. A `size` of zero
/// yields an empty result without reading `pivots`.
///
/// # Errors
///
/// `Error::IndexOutOfBounds` if a step index or a pivot value falls outside
/// `[0, size)`.
pub fn pivots_to_permutation(
    pivots: &[i64],
    batch: usize,
    k: usize,
    size: usize,
) -> Result<Vec<i64>> {
    if size == 0 {
        return Ok(Vec::new());
    }
    if pivots.len() != batch * k {
        return Err(Error::shape_mismatch(&[batch, k], &[pivots.len()]));
    }

    let mut permutation: Vec<i64> = (0..batch).flat_map(|_| 0..size as i64).collect();
    for (b, perm) in permutation.chunks_mut(size).enumerate() {
        let steps = &pivots[b * k..(b + 1) * k];
        for (i, &j) in steps.iter().enumerate() {
            if i >= size {
                return Err(Error::IndexOutOfBounds {
                    index: i as i64,
                    size,
                });
            }
            if j < 0 || j as usize >= size {
                return Err(Error::IndexOutOfBounds { index: j, size });
            }
            perm.swap(i, j as usize);
        }
    }
    Ok(permutation)
}

/// Convert a pivot tensor `[..., K]` into a permutation tensor `[..., size]`
///
/// Leading dimensions are batch dimensions; each batch element uses its own
/// pivots. The result is an I64 tensor on the pivots' device, usable as a
/// gather index: `permuted_rhs[i, ...] = rhs[permutation[i], ...]`.
///
/// Pivots may be I32 or I64. With `permutation_size == 0` the result has
/// shape `[..., 0]` whatever the pivot contents.
pub fn lu_pivots_to_permutation<R: Runtime>(
    pivots: &Tensor<R>,
    permutation_size: usize,
) -> Result<Tensor<R>> {
    let shape = pivots.shape();
    let Some((&k, batch_dims)) = shape.split_last() else {
        return Err(Error::invalid_shape(
            shape,
            "pivots must have at least 1 dimension",
        ));
    };

    let mut out_shape = batch_dims.to_vec();
    out_shape.push(permutation_size);

    let data = if permutation_size == 0 {
        Vec::new()
    } else {
        let batch: usize = batch_dims.iter().product();
        let steps = pivots.to_i64_vec("lu_pivots_to_permutation")?;
        pivots_to_permutation(&steps, batch, k, permutation_size)?
    };

    log::trace!(
        "lu_pivots_to_permutation: pivots {:?} -> permutation {:?}",
        shape,
        out_shape
    );
    Tensor::try_from_slice(&data, &out_shape, pivots.device())
}
