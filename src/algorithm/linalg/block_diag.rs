//! Block-diagonal assembly

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::runtime::{Runtime, RuntimeClient};
use crate::tensor::{Layout, Storage, Tensor};

/// Arrange matrices along the diagonal of a zero matrix
///
/// Inputs of rank 0 are treated as `[1, 1]` and rank 1 as `[1, n]`. The
/// output is `[sum(rows), sum(cols)]` with every input's dtype, which must
/// agree. With no inputs the result is an empty `[1, 0]` F64 matrix.
///
/// ```text
/// block_diag([A (2x2), B (1x3)]) =
///   [[a a 0 0 0]
///    [a a 0 0 0]
///    [0 0 b b b]]
/// ```
pub fn block_diag<R, C>(client: &C, tensors: &[Tensor<R>]) -> Result<Tensor<R>>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    let Some(first) = tensors.first() else {
        return Ok(Tensor::zeros(&[1, 0], DType::F64, client.device()));
    };
    let dtype = first.dtype();

    let mut blocks = Vec::with_capacity(tensors.len());
    for t in tensors {
        if t.dtype() != dtype {
            return Err(Error::DTypeMismatch {
                lhs: dtype,
                rhs: t.dtype(),
            });
        }
        if !t.same_device(first) {
            return Err(Error::DeviceMismatch);
        }
        let (rows, cols) = match *t.shape() {
            [] => (1, 1),
            [n] => (1, n),
            [m, n] => (m, n),
            _ => {
                return Err(Error::invalid_shape(
                    t.shape(),
                    "block_diag inputs must have at most 2 dimensions",
                ));
            }
        };
        blocks.push((t.raw_bytes(), rows, cols));
    }

    let total_rows: usize = blocks.iter().map(|&(_, r, _)| r).sum();
    let total_cols: usize = blocks.iter().map(|&(_, _, c)| c).sum();
    let elem = dtype.size_in_bytes();
    let row_stride = total_cols * elem;

    let mut out = vec![0u8; total_rows * row_stride];
    let (mut r0, mut c0) = (0, 0);
    for (bytes, rows, cols) in blocks {
        let width = cols * elem;
        for i in 0..rows {
            let dst = (r0 + i) * row_stride + c0 * elem;
            out[dst..dst + width].copy_from_slice(&bytes[i * width..(i + 1) * width]);
        }
        r0 += rows;
        c0 += cols;
    }

    log::trace!("block_diag: {} blocks -> [{total_rows}, {total_cols}]", tensors.len());
    Ok(Tensor::from_parts(
        Storage::from_bytes(out, dtype, first.device()),
        Layout::contiguous(&[total_rows, total_cols]),
    ))
}
