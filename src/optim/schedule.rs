use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the learning rate changes over the epochs of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LearningRateSchedule {
    Constant,
    /// Multiplies the rate by `factor` every `every` epochs, at most
    /// `max_drops` times.
    StepDecay { every: usize, factor: f64, max_drops: u32 },
}

impl Default for LearningRateSchedule {
    /// Halve every 50 epochs, three times: 1, 1/2, 1/4, then 1/8 from epoch 150.
    fn default() -> Self {
        LearningRateSchedule::StepDecay { every: 50, factor: 0.5, max_drops: 3 }
    }
}

impl LearningRateSchedule {
    /// Rejects schedules that would freeze or reverse training: `every == 0`
    /// or a `factor` outside `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            LearningRateSchedule::Constant => Ok(()),
            LearningRateSchedule::StepDecay { every, factor, .. } => {
                if every == 0 {
                    return Err(Error::InvalidConfig("step_decay every must be at least 1".into()));
                }
                if !(factor > 0.0 && factor <= 1.0) {
                    return Err(Error::InvalidConfig(format!(
                        "step_decay factor must be in (0, 1], got {}",
                        factor
                    )));
                }
                Ok(())
            }
        }
    }

    /// Rate for the 0-based `epoch`.
    pub fn rate_at(&self, base: f64, epoch: usize) -> f64 {
        match *self {
            LearningRateSchedule::Constant => base,
            LearningRateSchedule::StepDecay { every, factor, max_drops } => {
                if every == 0 {
                    return base;
                }
                let drops = (epoch / every).min(max_drops as usize) as i32;
                base * factor.powi(drops)
            }
        }
    }
}
