use serde::{Deserialize, Serialize};

/// Statistics reported by `train_loop` at the end of every epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch.
    pub loss: f64,
    /// `sqrt(loss)`, in the units of the targets.
    pub rmse: f64,
    /// Learning rate used for this epoch.
    pub learning_rate: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcome of a complete `train_loop` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainReport {
    pub history: Vec<EpochStats>,
    pub final_loss: f64,
    pub elapsed_ms: u64,
}
