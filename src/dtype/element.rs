//! Element trait for mapping Rust types to DType

use super::{Complex64, Complex128, DType};
use bytemuck::{Pod, Zeroable};
use std::ops::{Add, Div, Mul, Sub};

/// Trait for types that can be elements of a tensor
///
/// Connects Rust's type system to the runtime dtype carried by a tensor.
///
/// # Bounds
/// - `Pod + Zeroable` - Safe byte reinterpretation of storage (bytemuck)
/// - `Add + Sub + Mul + Div` - Arithmetic (Output = Self)
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + Zeroable
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert from f64 to this type (complex types get a zero imaginary part)
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;
}

/// Scalars the linear algebra kernels operate on: real and complex floats
pub trait LinalgElement: Element {
    /// |x| (modulus for complex), used for pivot selection
    fn magnitude(self) -> f64;

    /// Complex conjugate; identity for real types
    fn conj_val(self) -> Self;

    /// Exact-zero test used for singularity detection
    #[inline]
    fn is_zero(self) -> bool {
        self.magnitude() == 0.0
    }
}

macro_rules! impl_element {
    ($ty:ty, $dtype:expr, $zero:expr, $one:expr, |$v:ident| $from:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            #[inline]
            fn from_f64($v: f64) -> Self {
                $from
            }

            #[inline]
            fn zero() -> Self {
                $zero
            }

            #[inline]
            fn one() -> Self {
                $one
            }
        }
    };
}

impl_element!(f64, DType::F64, 0.0, 1.0, |v| v);
impl_element!(f32, DType::F32, 0.0, 1.0, |v| v as f32);
impl_element!(i64, DType::I64, 0, 1, |v| v as i64);
impl_element!(i32, DType::I32, 0, 1, |v| v as i32);
impl_element!(Complex64, DType::Complex64, Complex64::ZERO, Complex64::ONE, |v| {
    Complex64::new(v as f32, 0.0)
});
impl_element!(
    Complex128,
    DType::Complex128,
    Complex128::ZERO,
    Complex128::ONE,
    |v| Complex128::new(v, 0.0)
);

impl LinalgElement for f64 {
    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }
    #[inline]
    fn conj_val(self) -> Self {
        self
    }
}

impl LinalgElement for f32 {
    #[inline]
    fn magnitude(self) -> f64 {
        self.abs() as f64
    }
    #[inline]
    fn conj_val(self) -> Self {
        self
    }
}

impl LinalgElement for Complex64 {
    #[inline]
    fn magnitude(self) -> f64 {
        Complex64::magnitude(self) as f64
    }
    #[inline]
    fn conj_val(self) -> Self {
        self.conj()
    }
}

impl LinalgElement for Complex128 {
    #[inline]
    fn magnitude(self) -> f64 {
        Complex128::magnitude(self)
    }
    #[inline]
    fn conj_val(self) -> Self {
        self.conj()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_dtypes() {
        assert_eq!(<f64 as Element>::DTYPE, DType::F64);
        assert_eq!(<i32 as Element>::DTYPE, DType::I32);
        assert_eq!(<Complex128 as Element>::DTYPE, DType::Complex128);
    }

    #[test]
    fn test_conj_val() {
        assert_eq!(2.5f64.conj_val(), 2.5);
        let z = Complex128::new(1.0, -3.0);
        assert_eq!(z.conj_val(), Complex128::new(1.0, 3.0));
        assert!(Complex64::ZERO.is_zero());
        assert!(!Complex64::new(0.0, 1e-30).is_zero());
    }
}
