//! Layout: shape and offset for tensor memory layout

use smallvec::SmallVec;
use std::fmt;

/// Stack allocation threshold for dimensions
/// Batched LU operands rarely exceed 4 dimensions, so we stack-allocate up to 4
const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Layout describes which part of a storage buffer a tensor views
///
/// All layouts are row-major (C-order) and contiguous: a view is fully
/// described by its shape and the element offset of its first element.
/// Every view operation here (`reshape`, `unsqueeze`, `squeeze`, leading-axis
/// `narrow`) preserves contiguity, so no strides are tracked.
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    offset: usize,
}

impl Layout {
    /// Create a contiguous layout starting at offset 0
    ///
    /// # Example
    /// ```
    /// use lusolve::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.elem_count(), 24);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        Self {
            shape: shape.iter().copied().collect(),
            offset: 0,
        }
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the offset (in elements)
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Normalize a possibly negative dimension index
    pub fn normalize_dim(&self, d: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let d = if d < 0 { d + ndim } else { d };
        (0..ndim).contains(&d).then_some(d as usize)
    }

    /// Get size along a dimension (supports negative indexing)
    pub fn dim(&self, d: isize) -> Option<usize> {
        self.normalize_dim(d).map(|d| self.shape[d])
    }

    /// Reinterpret with a new shape holding the same number of elements
    pub fn reshape(&self, new_shape: &[usize]) -> Option<Self> {
        let count: usize = new_shape.iter().product();
        if count != self.elem_count() {
            return None;
        }
        Some(Self {
            shape: new_shape.iter().copied().collect(),
            offset: self.offset,
        })
    }

    /// Insert a size-1 dimension at `dim` (`-1` appends)
    pub fn unsqueeze(&self, dim: isize) -> Option<Self> {
        let ndim = self.ndim() as isize;
        let d = if dim < 0 { dim + ndim + 1 } else { dim };
        if !(0..=ndim).contains(&d) {
            return None;
        }
        let mut shape = self.shape.clone();
        shape.insert(d as usize, 1);
        Some(Self {
            shape,
            offset: self.offset,
        })
    }

    /// Remove a size-1 dimension at `dim`
    pub fn squeeze(&self, dim: isize) -> Option<Self> {
        let d = self.normalize_dim(dim)?;
        if self.shape[d] != 1 {
            return None;
        }
        let mut shape = self.shape.clone();
        shape.remove(d);
        Some(Self {
            shape,
            offset: self.offset,
        })
    }

    /// View `length` entries of the leading dimension starting at `start`
    pub fn narrow_leading(&self, start: usize, length: usize) -> Option<Self> {
        let first = *self.shape.first()?;
        if start.checked_add(length)? > first {
            return None;
        }
        let inner: usize = self.shape[1..].iter().product();
        let mut shape = self.shape.clone();
        shape[0] = length;
        Some(Self {
            shape,
            offset: self.offset + start * inner,
        })
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("shape", &self.shape.as_slice())
            .field("offset", &self.offset)
            .finish()
    }
}
