//! DType dispatch macros
//!
//! Bridge from a runtime [`DType`](crate::dtype::DType) to a monomorphized
//! generic call. Usage: `dispatch_linalg_dtype!(dtype, T => { code using T }, "op_name")`.
//! Dtypes the macro does not cover return `Error::UnsupportedDType` from the
//! enclosing function.

/// Dispatch over the dtypes implementing `LinalgElement` (real and complex floats)
#[macro_export]
macro_rules! dispatch_linalg_dtype {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::Complex64 => {
                type $T = $crate::dtype::Complex64;
                $body
            }
            $crate::dtype::DType::Complex128 => {
                type $T = $crate::dtype::Complex128;
                $body
            }
            dtype => {
                return Err($crate::error::Error::UnsupportedDType {
                    dtype,
                    op: $error_op,
                });
            }
        }
    };
}
