use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::spec::NetworkSpec;
use crate::train::train_config::TrainConfig;

/// Everything one run needs. Every field has a default, so a JSON file only
/// has to name what it changes:
///
/// ```json
/// { "training": { "epochs": 50, "seed": 7 }, "queries": [2, 3] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub network: NetworkSpec,
    pub training: TrainConfig,
    /// Number of training points: inputs `0..dataset_size`, targets `x²`.
    pub dataset_size: usize,
    /// Held-out inputs evaluated after training.
    pub queries: Vec<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            network: NetworkSpec::default(),
            training: TrainConfig::default(),
            dataset_size: 10,
            queries: vec![1.0, 5.0, 7.0, 10.0, 25.0],
        }
    }
}

impl RunConfig {
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.training.validate()?;
        if self.dataset_size < 2 {
            return Err(Error::InvalidConfig(format!(
                "dataset_size must be at least 2 to normalize, got {}",
                self.dataset_size
            )));
        }
        if self.network.input_size != 1 || self.network.output_size() != 1 {
            return Err(Error::InvalidConfig(format!(
                "network must map 1 input to 1 output, got {} -> {}",
                self.network.input_size,
                self.network.output_size()
            )));
        }
        if let Some(q) = self.queries.iter().find(|q| !q.is_finite()) {
            return Err(Error::InvalidConfig(format!("query {} is not a finite number", q)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::schedule::LearningRateSchedule;

    #[test]
    fn defaults_match_the_demo() {
        let c = RunConfig::default();
        assert_eq!(c.dataset_size, 10);
        assert_eq!(c.queries, vec![1.0, 5.0, 7.0, 10.0, 25.0]);
        assert_eq!(c.training.epochs, 200);
        assert_eq!(c.training.batch_size, 2);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let c: RunConfig = serde_json::from_str(r#"{ "training": { "epochs": 5 } }"#).unwrap();
        assert_eq!(c.training.epochs, 5);
        assert_eq!(c.training.batch_size, 2);
        assert_eq!(c.network, NetworkSpec::default());
    }

    #[test]
    fn json_round_trip() {
        let c = RunConfig::default();
        let back: RunConfig = serde_json::from_str(&c.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn rejects_vector_output() {
        let mut c = RunConfig::default();
        c.network.layers.last_mut().unwrap().units = 2;
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_decay_factor() {
        let mut c = RunConfig::default();
        c.training.schedule = LearningRateSchedule::StepDecay { every: 50, factor: 0.0, max_drops: 3 };
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_tiny_dataset() {
        let c = RunConfig { dataset_size: 1, ..RunConfig::default() };
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn load_json_reports_missing_file() {
        assert!(matches!(RunConfig::load_json("/nonexistent/squarefit.json"), Err(Error::Io(_))));
    }
}
