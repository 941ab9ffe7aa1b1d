pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod eval;
pub mod config;
pub mod session;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use math::memory::{memory, MemoryUsage};
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Network, NetworkSpec, LayerSpec};
pub use loss::mse::MseLoss;
pub use optim::{Sgd, LearningRateSchedule};
pub use data::{Dataset, MinMax, normalize};
pub use train::{train_loop, EpochStats, TrainConfig, TrainReport};
pub use eval::{predict, Prediction};
pub use config::RunConfig;
pub use session::{run, PanelSink, RunOutcome, WriterSink};
