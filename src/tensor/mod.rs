//! Tensor types and operations
//!
//! This module provides the core `Tensor` type, an n-dimensional array owned
//! by a runtime (see [`crate::runtime`]).

mod core;
mod layout;
mod storage;

pub use core::Tensor;
pub use layout::{Layout, Shape};
pub use storage::Storage;
