//! CPU client implementation

use super::device::CpuDevice;
use super::runtime::CpuRuntime;
use crate::runtime::RuntimeClient;

/// Smallest number of batch elements handed to one rayon task
const DEFAULT_RAYON_MIN_LEN: usize = 1;

/// CPU client for operation dispatch
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
    rayon_min_len: usize,
}

impl CpuClient {
    /// Create a new CPU client
    pub fn new(device: CpuDevice) -> Self {
        Self {
            device,
            rayon_min_len: DEFAULT_RAYON_MIN_LEN,
        }
    }

    /// Set the minimum number of batch elements per parallel task
    ///
    /// Larger values trade parallelism for less scheduling overhead on
    /// batches of small matrices. Has no effect without the `rayon` feature.
    pub fn with_rayon_min_len(mut self, min_len: usize) -> Self {
        self.rayon_min_len = min_len.max(1);
        self
    }

    /// Minimum number of batch elements per parallel task
    pub fn rayon_min_len(&self) -> usize {
        self.rayon_min_len
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }
}
