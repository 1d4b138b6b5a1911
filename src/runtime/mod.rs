//! Runtime backends for tensor computation
//!
//! This module defines the `Runtime` trait and the reference CPU backend.
//! A runtime names a device type and a client type; the client is what the
//! algorithms in [`crate::algorithm`] receive, and the capabilities it
//! implements (`LuFactorize`, `TriangularSolve`, `IndexingOps`) decide which
//! numerical kernels run.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies a compute unit)
//! └── Client (dispatches operations, implements capability traits)
//! ```

#[cfg(feature = "cpu")]
pub mod cpu;

/// Core trait for compute backends
///
/// Uses static dispatch via generics: algorithms are written once against
/// `R: Runtime` and a client bound, and monomorphized per backend.
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: Device;

    /// Client for dispatching operations
    type Client: RuntimeClient<Self>;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the default client for a device
    fn default_client(device: &Self::Device) -> Self::Client;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}

/// Trait for runtime clients that handle operation dispatch
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;
}
