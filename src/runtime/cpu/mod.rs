//! CPU runtime implementation
//!
//! The CPU runtime keeps tensor data in host memory and provides the
//! reference implementation of every capability trait in
//! [`crate::algorithm::linalg`].
//!
//! # Parallelism
//!
//! With the `rayon` feature, batched factorizations and solves process batch
//! elements in parallel. Work on a single matrix is always sequential.

mod client;
mod device;
pub(crate) mod kernels;
mod linalg;
mod runtime;

pub use crate::tensor::Tensor;
pub use client::CpuClient;
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
