use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

static LIVE_TENSORS: AtomicUsize = AtomicUsize::new(0);
static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Snapshot of the numeric buffers currently alive in the process.
///
/// Every `Matrix` registers itself on construction (including clones) and
/// unregisters on drop, so once a stage's buffers go out of scope they no
/// longer appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub num_tensors: usize,
    pub num_bytes: usize,
}

impl MemoryUsage {
    /// Size in megabytes (10^6 bytes), as shown in the panel.
    pub fn megabytes(&self) -> f64 {
        self.num_bytes as f64 / 1_000_000.0
    }
}

/// Returns the current live tensor count and byte total.
pub fn memory() -> MemoryUsage {
    MemoryUsage {
        num_tensors: LIVE_TENSORS.load(Ordering::Relaxed),
        num_bytes: LIVE_BYTES.load(Ordering::Relaxed),
    }
}

pub(crate) fn track_alloc(bytes: usize) {
    LIVE_TENSORS.fetch_add(1, Ordering::Relaxed);
    LIVE_BYTES.fetch_add(bytes, Ordering::Relaxed);
}

pub(crate) fn track_free(bytes: usize) {
    LIVE_TENSORS.fetch_sub(1, Ordering::Relaxed);
    LIVE_BYTES.fetch_sub(bytes, Ordering::Relaxed);
}
