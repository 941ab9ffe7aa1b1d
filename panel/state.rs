use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use squarefit::{MemoryUsage, PanelSink, RunConfig};

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum RunStatus {
    /// Nothing has been started since the server came up (or was reset).
    Idle,
    /// The pipeline is running on a background thread.
    Running,
    /// The pipeline finished; the transcript is complete.
    Done {
        elapsed_total_ms: u64,
        final_loss: f64,
        memory: MemoryUsage,
    },
    /// The pipeline stopped with an error.
    Failed { reason: String },
}

impl RunStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, RunStatus::Running)
    }
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct PanelState {
    /// Configuration used for the next run.
    pub config: RunConfig,
    pub status: RunStatus,
    /// Text chunks appended by the current or last run, in order.
    pub transcript: Vec<String>,
}

impl PanelState {
    pub fn new(config: RunConfig) -> Self {
        PanelState { config, status: RunStatus::Idle, transcript: Vec::new() }
    }

    /// Back to `Idle` unless a run is in progress. Returns whether it reset.
    pub fn reset(&mut self) -> bool {
        if self.status.is_running() {
            return false;
        }
        self.status = RunStatus::Idle;
        self.transcript.clear();
        true
    }
}

/// State plus a condition variable signalled whenever the transcript or the
/// status changes, so streaming handlers can wait for new text.
pub struct Shared {
    pub state: Mutex<PanelState>,
    pub changed: Condvar,
}

/// Shared state type passed to every handler.
pub type SharedState = Arc<Shared>;

pub fn new_shared(config: RunConfig) -> SharedState {
    Arc::new(Shared { state: Mutex::new(PanelState::new(config)), changed: Condvar::new() })
}

/// Locks the state, recovering the data if a handler thread panicked.
pub fn lock(shared: &Shared) -> MutexGuard<'_, PanelState> {
    shared.state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Panel sink used by the run thread: appends to the shared transcript and
/// wakes every waiting viewer.
pub struct TranscriptSink {
    shared: SharedState,
}

impl TranscriptSink {
    pub fn new(shared: SharedState) -> Self {
        TranscriptSink { shared }
    }
}

impl PanelSink for TranscriptSink {
    fn append(&mut self, text: &str) {
        lock(&self.shared).transcript.push(text.to_owned());
        self.shared.changed.notify_all();
    }
}
