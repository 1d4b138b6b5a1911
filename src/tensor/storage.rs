//! Storage: reference-counted element buffers shared between views

use crate::dtype::{DType, Element};
use crate::runtime::Runtime;
use std::sync::Arc;

/// Storage for tensor data
///
/// Storage wraps an immutable byte buffer with reference counting, enabling
/// zero-copy views (reshape, narrow, unsqueeze) that share one allocation.
/// Nothing in the crate writes into a storage after construction, which is
/// what lets a reshaped working copy of a right-hand side coexist with the
/// caller's tensor.
pub struct Storage<R: Runtime> {
    inner: Arc<StorageInner<R>>,
}

struct StorageInner<R: Runtime> {
    bytes: Vec<u8>,
    /// Number of elements (not bytes)
    len: usize,
    dtype: DType,
    device: R::Device,
}

impl<R: Runtime> Storage<R> {
    /// Create storage from typed data, inferring the dtype
    pub fn from_slice<T: Element>(data: &[T], device: &R::Device) -> Self {
        Self::from_bytes(bytemuck::cast_slice(data).to_vec(), T::DTYPE, device)
    }

    /// Create storage from raw bytes with explicit dtype
    ///
    /// `bytes.len()` must be a multiple of the dtype's element size.
    pub fn from_bytes(bytes: Vec<u8>, dtype: DType, device: &R::Device) -> Self {
        debug_assert_eq!(bytes.len() % dtype.size_in_bytes(), 0);
        let len = bytes.len() / dtype.size_in_bytes();
        Self {
            inner: Arc::new(StorageInner {
                bytes,
                len,
                dtype,
                device: device.clone(),
            }),
        }
    }

    /// Number of elements the buffer holds
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.inner.len
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.inner.dtype
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        &self.inner.device
    }

    /// Raw bytes of `count` elements starting at element `offset`
    pub(crate) fn bytes(&self, offset: usize, count: usize) -> &[u8] {
        let elem = self.inner.dtype.size_in_bytes();
        &self.inner.bytes[offset * elem..(offset + count) * elem]
    }

    /// Whether two handles share one allocation
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<R: Runtime> Clone for Storage<R> {
    /// Clone increments the reference count (zero-copy)
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Runtime> std::fmt::Debug for Storage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("len", &self.inner.len)
            .field("dtype", &self.inner.dtype)
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}
