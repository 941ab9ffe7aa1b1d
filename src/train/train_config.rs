use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::optim::schedule::LearningRateSchedule;

/// Hyperparameters for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — exact number of full passes over the training data
/// - `batch_size`    — samples per mini-batch; use `1` for online SGD
/// - `shuffle`       — reshuffle sample order at the start of every epoch
/// - `learning_rate` — base SGD rate, scaled per epoch by `schedule`
/// - `seed`          — fixes every random choice of the run when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub shuffle: bool,
    pub learning_rate: f64,
    pub schedule: LearningRateSchedule,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 200,
            batch_size: 2,
            shuffle: true,
            learning_rate: 0.001,
            schedule: LearningRateSchedule::default(),
            seed: None,
        }
    }
}

impl TrainConfig {
    /// Learning rate in effect during the 0-based `epoch`.
    pub fn rate_at(&self, epoch: usize) -> f64 {
        self.schedule.rate_at(self.learning_rate, epoch)
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        self.schedule.validate()
    }
}
