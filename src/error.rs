use thiserror::Error;

/// Errors produced while preparing data, building the model, training or
/// evaluating it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("length mismatch: {inputs} inputs but {outputs} outputs")]
    LengthMismatch { inputs: usize, outputs: usize },

    #[error("cannot normalize: min ({min}) equals max ({max})")]
    DegenerateRange { min: f64, max: f64 },

    #[error("input has {actual} features, network expects {expected}")]
    InputShape { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
