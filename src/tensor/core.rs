//! Core Tensor type

use super::{Layout, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::{Device, Runtime};
use std::fmt;

/// N-dimensional array owned by a runtime
///
/// `Tensor` consists of:
/// - **Storage**: Reference-counted, immutable element buffer
/// - **Layout**: Shape and offset defining the view into storage
///
/// # Zero-Copy Views
///
/// `reshape`, `unsqueeze`, `squeeze` and `narrow_leading` return new tensors
/// sharing the same storage. Since storage is never written after creation,
/// a view can never alias a result: every operation that produces new values
/// allocates fresh storage.
///
/// # Example
///
/// ```
/// use lusolve::prelude::*;
///
/// let device = CpuDevice::new();
/// let b = Tensor::<CpuRuntime>::try_from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[4], &device)?;
/// let col = b.unsqueeze(-1)?; // [4, 1], shares storage with b
/// assert_eq!(col.shape(), &[4, 1]);
/// # Ok::<(), lusolve::error::Error>(())
/// ```
pub struct Tensor<R: Runtime> {
    storage: Storage<R>,
    layout: Layout,
}

impl<R: Runtime> Tensor<R> {
    /// Create a tensor from storage and layout
    ///
    /// The layout must address elements inside the storage.
    pub fn from_parts(storage: Storage<R>, layout: Layout) -> Self {
        debug_assert!(layout.offset() + layout.elem_count() <= storage.elem_count());
        Self { storage, layout }
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], device: &R::Device) -> Self {
        Self::try_from_slice(data, shape, device).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions.
    pub fn try_from_slice<T: Element>(
        data: &[T],
        shape: &[usize],
        device: &R::Device,
    ) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        Ok(Self {
            storage: Storage::from_slice(data, device),
            layout: Layout::contiguous(shape),
        })
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Self {
        let len: usize = shape.iter().product();
        let bytes = vec![0u8; len * dtype.size_in_bytes()];
        Self {
            storage: Storage::from_bytes(bytes, dtype, device),
            layout: Layout::contiguous(shape),
        }
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage<R> {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.storage.device()
    }

    /// Get size along a dimension (supports negative indexing)
    pub fn size(&self, dim: isize) -> Option<usize> {
        self.layout.dim(dim)
    }

    /// Whether `other` lives on the same device
    pub fn same_device(&self, other: &Self) -> bool {
        self.device().is_same(other.device())
    }

    // ===== View Operations (Zero-Copy) =====

    /// Reshape to a new shape with the same element count
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let layout = self
            .layout
            .reshape(shape)
            .ok_or_else(|| Error::shape_mismatch(shape, self.shape()))?;
        Ok(self.view(layout))
    }

    /// Add a dimension of size 1
    pub fn unsqueeze(&self, dim: isize) -> Result<Self> {
        let layout = self
            .layout
            .unsqueeze(dim)
            .ok_or_else(|| Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;
        Ok(self.view(layout))
    }

    /// Remove a dimension of size 1
    pub fn squeeze(&self, dim: isize) -> Result<Self> {
        let layout = self
            .layout
            .squeeze(dim)
            .ok_or_else(|| Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;
        Ok(self.view(layout))
    }

    /// Select `length` entries of the leading dimension starting at `start`
    pub fn narrow_leading(&self, start: usize, length: usize) -> Result<Self> {
        let layout = self
            .layout
            .narrow_leading(start, length)
            .ok_or(Error::IndexOutOfBounds {
                index: (start + length) as i64,
                size: self.shape().first().copied().unwrap_or(0),
            })?;
        Ok(self.view(layout))
    }

    fn view(&self, layout: Layout) -> Self {
        Self {
            storage: self.storage.clone(),
            layout,
        }
    }

    // ===== Assembly =====

    /// Stack equally shaped tensors along a new leading dimension
    pub fn stack(parts: &[Self]) -> Result<Self> {
        let first = parts
            .first()
            .ok_or_else(|| Error::invalid_argument("parts", "cannot stack zero tensors"))?;
        let mut bytes = Vec::with_capacity(
            parts.len() * first.numel() * first.dtype().size_in_bytes(),
        );
        for part in parts {
            if part.dtype() != first.dtype() {
                return Err(Error::DTypeMismatch {
                    lhs: first.dtype(),
                    rhs: part.dtype(),
                });
            }
            if part.shape() != first.shape() {
                return Err(Error::shape_mismatch(first.shape(), part.shape()));
            }
            if !part.same_device(first) {
                return Err(Error::DeviceMismatch);
            }
            bytes.extend_from_slice(part.raw_bytes());
        }

        let mut shape = Vec::with_capacity(first.ndim() + 1);
        shape.push(parts.len());
        shape.extend_from_slice(first.shape());
        Ok(Self {
            storage: Storage::from_bytes(bytes, first.dtype(), first.device()),
            layout: Layout::contiguous(&shape),
        })
    }

    // ===== Data Access =====

    /// Bytes of the viewed region
    pub(crate) fn raw_bytes(&self) -> &[u8] {
        self.storage.bytes(self.layout.offset(), self.numel())
    }

    /// Copy tensor data to a Vec on the host
    ///
    /// `T` must have the tensor's element size; use it with the type matching
    /// [`Self::dtype`].
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Vec<T> {
        debug_assert_eq!(std::mem::size_of::<T>(), self.dtype().size_in_bytes());

        // Allocate with T's alignment, then fill through a byte view of it
        let mut result = vec![T::zeroed(); self.numel()];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut result);
        bytes.copy_from_slice(self.raw_bytes());
        result
    }

    /// Integer contents widened to i64 (I32 or I64 tensors only)
    pub fn to_i64_vec(&self, op: &'static str) -> Result<Vec<i64>> {
        match self.dtype() {
            DType::I64 => Ok(self.to_vec::<i64>()),
            DType::I32 => Ok(self.to_vec::<i32>().into_iter().map(i64::from).collect()),
            dtype => Err(Error::unsupported_dtype(dtype, op)),
        }
    }
}

impl<R: Runtime> Clone for Tensor<R> {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl<R: Runtime> fmt::Debug for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("device", &self.device().name())
            .finish()
    }
}

impl<R: Runtime> fmt::Display for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}
