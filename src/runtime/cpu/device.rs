//! Host device handle

use crate::runtime::Device;

/// The host CPU
///
/// All CPU tensors live in host memory, so every handle compares equal and
/// reports device id 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuDevice;

impl CpuDevice {
    /// Handle to the host CPU
    pub const fn new() -> Self {
        Self
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        0
    }

    fn name(&self) -> String {
        "cpu".into()
    }
}
